//! World-level persistence: per-object operations and the two-pass loader
//!
//! Objects reference each other by name, so a world loads in two passes:
//! the referenced types first (items, movements, terrains), indexed by
//! name, then the referencing types (creatures, traders, spawners, maps)
//! with their name-valued fields resolved against those indexes. A name
//! that resolves to nothing leaves the field unset and is recorded in the
//! [`ResolveReport`]; a resource that fails to read or parse is logged and
//! skipped without failing the batch.

use std::collections::BTreeMap;
use std::sync::Arc;

use mapwright_domain::{
    Creature, GameMap, Item, Movement, ObjectInstance, Spawner, Terrain, Trader, WorldObject,
};
use tracing::{debug, warn};

use crate::codec::{
    decode_creature, decode_item, decode_movement, decode_spawner, decode_terrain, decode_trader,
    encode_creature, encode_item, encode_movement, encode_spawner, encode_terrain, encode_trader,
    CreatureRefs, SpawnerRefs, TraderRefs,
};
use crate::error::StoreError;
use crate::field_map::FieldMap;
use crate::map_document::MapDocument;
use crate::ports::TextStorage;

const ITEM_COLLECTION: &str = "item";
const MOVEMENT_COLLECTION: &str = "movement";
const TERRAIN_COLLECTION: &str = "terrain";
const CREATURE_COLLECTION: &str = "creature";
const TRADER_COLLECTION: &str = "trader";
const SPAWNER_COLLECTION: &str = "spawner";
const MAP_COLLECTION: &str = "map";

/// Everything a loaded world contains. Shared definitions are name-indexed
/// behind `Arc` so referencing objects alias rather than copy them.
#[derive(Debug, Default)]
pub struct WorldSnapshot {
    pub items: BTreeMap<String, Arc<Item>>,
    pub movements: BTreeMap<String, Arc<Movement>>,
    pub terrains: BTreeMap<String, Arc<Terrain>>,
    pub creatures: Vec<Creature>,
    pub traders: Vec<Trader>,
    pub spawners: Vec<Spawner>,
    pub maps: Vec<GameMap>,
}

/// A reference whose name matched nothing in the loaded indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    /// The referencing object, e.g. `creature 'wolf'`.
    pub object: String,
    /// The field holding the dangling name.
    pub field: String,
    /// The name that failed to resolve.
    pub name: String,
}

#[derive(Debug, Default)]
pub struct ResolveReport {
    pub unresolved: Vec<UnresolvedReference>,
}

impl ResolveReport {
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty()
    }

    fn record(&mut self, object: &str, field: &str, name: &str) {
        warn!(object, field, name, "unresolved reference, leaving field unset");
        self.unresolved.push(UnresolvedReference {
            object: object.to_string(),
            field: field.to_string(),
            name: name.to_string(),
        });
    }
}

pub struct WorldStore<S: TextStorage> {
    storage: S,
}

impl<S: TextStorage> WorldStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn write_fields(
        &self,
        collection: &str,
        name: &str,
        fields: &FieldMap,
    ) -> Result<(), StoreError> {
        let text = fields
            .to_json()
            .map_err(|e| StoreError::format(collection, name, e))?;
        self.storage.write(collection, name, &text)
    }

    fn read_fields(&self, collection: &str, name: &str) -> Result<FieldMap, StoreError> {
        let text = self.storage.read(collection, name)?;
        FieldMap::from_json(&text).map_err(|e| StoreError::format(collection, name, e))
    }

    pub fn save_item(&self, item: &Item) -> Result<(), StoreError> {
        self.write_fields(ITEM_COLLECTION, item.name(), &encode_item(item))
    }

    pub fn load_item(&self, name: &str) -> Result<Item, StoreError> {
        Ok(decode_item(&self.read_fields(ITEM_COLLECTION, name)?))
    }

    pub fn save_movement(&self, movement: &Movement) -> Result<(), StoreError> {
        self.write_fields(
            MOVEMENT_COLLECTION,
            movement.name(),
            &encode_movement(movement),
        )
    }

    pub fn load_movement(&self, name: &str) -> Result<Movement, StoreError> {
        Ok(decode_movement(&self.read_fields(MOVEMENT_COLLECTION, name)?))
    }

    pub fn save_terrain(&self, terrain: &Terrain) -> Result<(), StoreError> {
        self.write_fields(TERRAIN_COLLECTION, terrain.name(), &encode_terrain(terrain))
    }

    pub fn load_terrain(&self, name: &str) -> Result<Terrain, StoreError> {
        Ok(decode_terrain(&self.read_fields(TERRAIN_COLLECTION, name)?))
    }

    pub fn save_creature(&self, creature: &Creature) -> Result<(), StoreError> {
        self.write_fields(
            CREATURE_COLLECTION,
            creature.name(),
            &encode_creature(creature),
        )
    }

    /// Load one creature without resolving its references; the returned
    /// [`CreatureRefs`] carries the raw names. [`WorldStore::load_world`]
    /// resolves them against the full indexes.
    pub fn load_creature(&self, name: &str) -> Result<(Creature, CreatureRefs), StoreError> {
        Ok(decode_creature(&self.read_fields(CREATURE_COLLECTION, name)?))
    }

    pub fn save_trader(&self, trader: &Trader) -> Result<(), StoreError> {
        self.write_fields(TRADER_COLLECTION, trader.name(), &encode_trader(trader))
    }

    pub fn load_trader(&self, name: &str) -> Result<(Trader, TraderRefs), StoreError> {
        Ok(decode_trader(&self.read_fields(TRADER_COLLECTION, name)?))
    }

    pub fn save_spawner(&self, spawner: &Spawner) -> Result<(), StoreError> {
        self.write_fields(SPAWNER_COLLECTION, spawner.name(), &encode_spawner(spawner))
    }

    pub fn load_spawner(&self, name: &str) -> Result<(Spawner, SpawnerRefs), StoreError> {
        Ok(decode_spawner(&self.read_fields(SPAWNER_COLLECTION, name)?))
    }

    pub fn save_map(&self, map: &GameMap) -> Result<(), StoreError> {
        let doc = MapDocument::from_map(map);
        let text = doc
            .to_json()
            .map_err(|e| StoreError::format(MAP_COLLECTION, map.name(), e))?;
        self.storage.write(MAP_COLLECTION, map.name(), &text)
    }

    /// Load one map, re-attaching terrain and entities through the
    /// snapshot's indexes. Unknown terrain names leave the cell bare;
    /// unknown entity names are skipped. Both are recorded in the report.
    pub fn load_map(
        &self,
        name: &str,
        snapshot: &WorldSnapshot,
    ) -> Result<(GameMap, ResolveReport), StoreError> {
        let text = self.storage.read(MAP_COLLECTION, name)?;
        let doc =
            MapDocument::from_json(&text).map_err(|e| StoreError::format(MAP_COLLECTION, name, e))?;
        let mut report = ResolveReport::default();
        let map = attach_map(&doc, snapshot, &mut report)?;
        Ok((map, report))
    }

    /// Persist every object in the snapshot.
    pub fn save_world(&self, snapshot: &WorldSnapshot) -> Result<(), StoreError> {
        for item in snapshot.items.values() {
            self.save_item(item)?;
        }
        for movement in snapshot.movements.values() {
            self.save_movement(movement)?;
        }
        for terrain in snapshot.terrains.values() {
            self.save_terrain(terrain)?;
        }
        for creature in &snapshot.creatures {
            self.save_creature(creature)?;
        }
        for trader in &snapshot.traders {
            self.save_trader(trader)?;
        }
        for spawner in &snapshot.spawners {
            self.save_spawner(spawner)?;
        }
        for map in &snapshot.maps {
            self.save_map(map)?;
        }
        debug!(
            items = snapshot.items.len(),
            movements = snapshot.movements.len(),
            terrains = snapshot.terrains.len(),
            creatures = snapshot.creatures.len(),
            traders = snapshot.traders.len(),
            spawners = snapshot.spawners.len(),
            maps = snapshot.maps.len(),
            "world saved"
        );
        Ok(())
    }

    /// Load the whole world.
    ///
    /// Pass 1 loads and name-indexes items, movements, and terrains. Pass 2
    /// loads creatures, traders, spawners, and maps, resolving their
    /// name-valued references against the pass-1 indexes (spawner templates
    /// and map entities also against the pass-2 lists). A resource that
    /// fails to read or parse is logged and skipped; the batch continues.
    pub fn load_world(&self) -> Result<(WorldSnapshot, ResolveReport), StoreError> {
        let mut snapshot = WorldSnapshot::default();
        let mut report = ResolveReport::default();

        for name in self.storage.list(ITEM_COLLECTION)? {
            match self.load_item(&name) {
                Ok(item) => {
                    snapshot.items.insert(item.name().to_string(), Arc::new(item));
                }
                Err(error) => warn!(collection = ITEM_COLLECTION, name = %name, %error, "skipping unreadable resource"),
            }
        }
        for name in self.storage.list(MOVEMENT_COLLECTION)? {
            match self.load_movement(&name) {
                Ok(movement) => {
                    snapshot
                        .movements
                        .insert(movement.name().to_string(), Arc::new(movement));
                }
                Err(error) => warn!(collection = MOVEMENT_COLLECTION, name = %name, %error, "skipping unreadable resource"),
            }
        }
        for name in self.storage.list(TERRAIN_COLLECTION)? {
            match self.load_terrain(&name) {
                Ok(terrain) => {
                    snapshot
                        .terrains
                        .insert(terrain.name().to_string(), Arc::new(terrain));
                }
                Err(error) => warn!(collection = TERRAIN_COLLECTION, name = %name, %error, "skipping unreadable resource"),
            }
        }

        for name in self.storage.list(CREATURE_COLLECTION)? {
            match self.load_creature(&name) {
                Ok((mut creature, refs)) => {
                    resolve_creature(&mut creature, &refs, &snapshot, &mut report);
                    snapshot.creatures.push(creature);
                }
                Err(error) => warn!(collection = CREATURE_COLLECTION, name = %name, %error, "skipping unreadable resource"),
            }
        }
        for name in self.storage.list(TRADER_COLLECTION)? {
            match self.load_trader(&name) {
                Ok((mut trader, refs)) => {
                    resolve_trader(&mut trader, &refs, &snapshot, &mut report);
                    snapshot.traders.push(trader);
                }
                Err(error) => warn!(collection = TRADER_COLLECTION, name = %name, %error, "skipping unreadable resource"),
            }
        }
        for name in self.storage.list(SPAWNER_COLLECTION)? {
            match self.load_spawner(&name) {
                Ok((mut spawner, refs)) => {
                    resolve_spawner(&mut spawner, &refs, &snapshot, &mut report);
                    snapshot.spawners.push(spawner);
                }
                Err(error) => warn!(collection = SPAWNER_COLLECTION, name = %name, %error, "skipping unreadable resource"),
            }
        }
        for name in self.storage.list(MAP_COLLECTION)? {
            match self.load_map_document(&name) {
                Ok(doc) => match attach_map(&doc, &snapshot, &mut report) {
                    Ok(map) => snapshot.maps.push(map),
                    Err(error) => warn!(collection = MAP_COLLECTION, name = %name, %error, "skipping invalid map"),
                },
                Err(error) => warn!(collection = MAP_COLLECTION, name = %name, %error, "skipping unreadable resource"),
            }
        }

        debug!(
            items = snapshot.items.len(),
            creatures = snapshot.creatures.len(),
            traders = snapshot.traders.len(),
            spawners = snapshot.spawners.len(),
            maps = snapshot.maps.len(),
            unresolved = report.unresolved.len(),
            "world loaded"
        );
        Ok((snapshot, report))
    }

    fn load_map_document(&self, name: &str) -> Result<MapDocument, StoreError> {
        let text = self.storage.read(MAP_COLLECTION, name)?;
        MapDocument::from_json(&text).map_err(|e| StoreError::format(MAP_COLLECTION, name, e))
    }
}

fn resolve_creature(
    creature: &mut Creature,
    refs: &CreatureRefs,
    snapshot: &WorldSnapshot,
    report: &mut ResolveReport,
) {
    let context = format!("creature '{}'", creature.name());
    if let Some(name) = &refs.item_drop {
        match snapshot.items.get(name) {
            Some(item) => creature.set_item_drop(Some(Arc::clone(item))),
            None => report.record(&context, "itemDrop", name),
        }
    }
    if let Some(name) = &refs.movement {
        match snapshot.movements.get(name) {
            Some(movement) => creature.set_movement(Some(Arc::clone(movement))),
            None => report.record(&context, "movement", name),
        }
    }
}

fn resolve_trader(
    trader: &mut Trader,
    refs: &TraderRefs,
    snapshot: &WorldSnapshot,
    report: &mut ResolveReport,
) {
    let context = format!("trader '{}'", trader.name());
    if let Some(name) = &refs.passive_movement {
        match snapshot.movements.get(name) {
            Some(movement) => trader.set_passive_movement(Some(Arc::clone(movement))),
            None => report.record(&context, "passiveMovement", name),
        }
    }
    if let Some(name) = &refs.aggro_movement {
        match snapshot.movements.get(name) {
            Some(movement) => trader.set_aggro_movement(Some(Arc::clone(movement))),
            None => report.record(&context, "aggroMovement", name),
        }
    }
    for name in &refs.trade_offers {
        match snapshot.items.get(name) {
            Some(item) => trader.add_trade_offer(Arc::clone(item)),
            None => report.record(&context, "tradeOffers", name),
        }
    }
}

/// A spawner's template resolves against the index matching its configured
/// type token; tokens that name no spawnable kind leave the template unset
/// without a report entry (such spawners are valid and simply never spawn).
fn resolve_spawner(
    spawner: &mut Spawner,
    refs: &SpawnerRefs,
    snapshot: &WorldSnapshot,
    report: &mut ResolveReport,
) {
    let Some(name) = &refs.object_template else {
        return;
    };
    let context = format!("spawner '{}'", spawner.name());
    let template: Option<WorldObject> = match spawner.object_type() {
        "item" => snapshot
            .items
            .get(name)
            .map(|item| WorldObject::from(item.as_ref().clone())),
        "creature" => find_by_name(&snapshot.creatures, name).map(WorldObject::from),
        "trader" => find_by_name(&snapshot.traders, name).map(WorldObject::from),
        _ => return,
    };
    match template {
        Some(object) => spawner.set_object_template(Some(Arc::new(object))),
        None => report.record(&context, "objectTemplate", name),
    }
}

fn find_by_name<T: ObjectInstance + Clone>(objects: &[T], name: &str) -> Option<T> {
    objects.iter().find(|o| o.name() == name).cloned()
}

fn attach_map(
    doc: &MapDocument,
    snapshot: &WorldSnapshot,
    report: &mut ResolveReport,
) -> Result<GameMap, StoreError> {
    let mut map = GameMap::new(doc.name.clone(), doc.width, doc.height)?;
    let context = format!("map '{}'", doc.name);

    for record in &doc.cells {
        let Some(cell) = map.cell_mut(record.x, record.y) else {
            warn!(object = %context, x = record.x, y = record.y, "cell record out of bounds, skipping");
            continue;
        };
        if let Some(terrain_name) = &record.terrain {
            match snapshot.terrains.get(terrain_name) {
                Some(terrain) => cell.set_terrain(Some(Arc::clone(terrain))),
                None => report.record(&context, "terrain", terrain_name),
            }
        }
        for entity in &record.entities {
            let object: Option<WorldObject> = match entity.object_type.as_str() {
                "item" => snapshot
                    .items
                    .get(&entity.name)
                    .map(|item| WorldObject::from(item.as_ref().clone())),
                "creature" => find_by_name(&snapshot.creatures, &entity.name).map(WorldObject::from),
                "trader" => find_by_name(&snapshot.traders, &entity.name).map(WorldObject::from),
                "terrain" => snapshot
                    .terrains
                    .get(&entity.name)
                    .map(|terrain| WorldObject::from(terrain.as_ref().clone())),
                "movement" => snapshot
                    .movements
                    .get(&entity.name)
                    .map(|movement| WorldObject::from(movement.as_ref().clone())),
                "spawner" => find_by_name(&snapshot.spawners, &entity.name).map(WorldObject::from),
                _ => None,
            };
            match object {
                Some(object) => cell.add_entity(object),
                None => report.record(&context, "entities", &entity.name),
            }
        }
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStorage;

    fn store() -> WorldStore<MemoryStorage> {
        WorldStore::new(MemoryStorage::new())
    }

    fn seeded_store() -> WorldStore<MemoryStorage> {
        let store = store();
        let fang = Item::new("fang");
        store.save_item(&fang).expect("save item");
        let patrol = Movement::new("patrol");
        store.save_movement(&patrol).expect("save movement");

        let mut wolf = Creature::new("wolf");
        wolf.set_item_drop(Some(Arc::new(fang)));
        wolf.set_movement(Some(Arc::new(patrol)));
        store.save_creature(&wolf).expect("save creature");
        store
    }

    #[test]
    fn test_creature_references_resolve_when_targets_exist() {
        let store = seeded_store();
        let (snapshot, report) = store.load_world().expect("load world");

        assert!(report.is_clean());
        let wolf = &snapshot.creatures[0];
        let drop = wolf.item_drop().expect("drop resolved");
        assert_eq!(drop.name(), "fang");
        // The resolved reference aliases the indexed item.
        assert!(Arc::ptr_eq(drop, &snapshot.items["fang"]));
        assert!(wolf.movement().is_some());
    }

    #[test]
    fn test_unknown_names_stay_unset_and_are_reported() {
        let store = seeded_store();
        store
            .storage()
            .remove("item", "fang")
            .expect("remove item");

        let (snapshot, report) = store.load_world().expect("load world");
        let wolf = &snapshot.creatures[0];
        assert!(wolf.item_drop().is_none());
        assert!(wolf.movement().is_some());
        assert_eq!(
            report.unresolved,
            vec![UnresolvedReference {
                object: "creature 'wolf'".into(),
                field: "itemDrop".into(),
                name: "fang".into(),
            }]
        );
    }

    #[test]
    fn test_malformed_resource_is_skipped_not_fatal() {
        let store = seeded_store();
        store
            .storage()
            .write("creature", "broken", "not json")
            .expect("write");

        let (snapshot, _) = store.load_world().expect("load world");
        assert_eq!(snapshot.creatures.len(), 1);
        assert_eq!(snapshot.creatures[0].name(), "wolf");
    }

    #[test]
    fn test_spawner_template_resolves_by_type_token() {
        let store = seeded_store();
        let mut den = Spawner::new("den");
        den.set_object_type("creature");
        let template: WorldObject = Creature::new("wolf").into();
        den.set_object_template(Some(Arc::new(template)));
        store.save_spawner(&den).expect("save spawner");

        let (snapshot, report) = store.load_world().expect("load world");
        assert!(report.is_clean());
        let loaded = &snapshot.spawners[0];
        let template = loaded.object_template().expect("template resolved");
        assert!(template.as_creature().is_some());
        assert_eq!(template.name(), "wolf");
    }

    #[test]
    fn test_unknown_spawner_type_token_leaves_template_unset_silently() {
        let store = store();
        let mut gate = Spawner::new("gate");
        gate.set_object_type("portal");
        gate.set_object_template(Some(Arc::new(Item::new("rift").into())));
        store.save_spawner(&gate).expect("save spawner");

        let (snapshot, report) = store.load_world().expect("load world");
        assert!(snapshot.spawners[0].object_template().is_none());
        assert!(report.is_clean());
    }

    #[test]
    fn test_map_round_trip_reattaches_terrain_and_entities() {
        let store = seeded_store();
        let grass = Terrain::new("grass");
        store.save_terrain(&grass).expect("save terrain");

        let mut map = GameMap::new("vale", 2, 2).expect("valid dimensions");
        map.fill_with_terrain(&Arc::new(grass));
        map.cell_mut(0, 1)
            .expect("in bounds")
            .add_entity(Item::new("fang").into());
        store.save_map(&map).expect("save map");

        let (snapshot, report) = store.load_world().expect("load world");
        assert!(report.is_clean());
        let loaded = &snapshot.maps[0];
        assert_eq!((loaded.width(), loaded.height()), (2, 2));
        assert!(loaded
            .cells()
            .all(|cell| cell.terrain().is_some_and(|t| t.name() == "grass")));
        let cell = loaded.cell(0, 1).expect("in bounds");
        assert_eq!(cell.entity_count(), 1);
        assert_eq!(cell.entities()[0].name(), "fang");
    }

    #[test]
    fn test_map_with_unknown_entity_skips_it_and_reports() {
        let store = store();
        let mut map = GameMap::new("vale", 1, 1).expect("valid dimensions");
        map.cell_mut(0, 0)
            .expect("in bounds")
            .add_entity(Item::new("ghost").into());
        store.save_map(&map).expect("save map");

        let (snapshot, report) = store.load_world().expect("load world");
        let cell = snapshot.maps[0].cell(0, 0).expect("in bounds");
        assert_eq!(cell.entity_count(), 0);
        assert_eq!(report.unresolved.len(), 1);
        assert_eq!(report.unresolved[0].field, "entities");
    }

    #[test]
    fn test_trader_offers_resolve_in_stored_order() {
        let store = store();
        store.save_item(&Item::new("rope")).expect("save item");
        store.save_item(&Item::new("lantern")).expect("save item");

        let mut pedlar = Trader::new("pedlar");
        pedlar.add_trade_offer(Arc::new(Item::new("rope")));
        pedlar.add_trade_offer(Arc::new(Item::new("lantern")));
        store.save_trader(&pedlar).expect("save trader");

        let (snapshot, report) = store.load_world().expect("load world");
        assert!(report.is_clean());
        let names: Vec<_> = snapshot.traders[0]
            .stored_trade_offers()
            .iter()
            .map(|o| o.name().to_string())
            .collect();
        assert_eq!(names, vec!["rope", "lantern"]);
    }

    #[test]
    fn test_save_world_round_trips_a_full_snapshot() {
        let source = seeded_store();
        let (snapshot, _) = source.load_world().expect("load world");

        let copy = store();
        copy.save_world(&snapshot).expect("save world");
        let (reloaded, report) = copy.load_world().expect("reload world");

        assert!(report.is_clean());
        assert_eq!(reloaded.items.len(), 1);
        assert_eq!(reloaded.movements.len(), 1);
        assert_eq!(reloaded.creatures.len(), 1);
        assert_eq!(reloaded.creatures[0].id(), snapshot.creatures[0].id());
    }
}
