//! In-memory store behind a single reader-writer lock.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{AirportCode, Itinerary, ItineraryId};

use super::bucket::RouteBucket;
use super::{Criterion, ItineraryStore, StoreError};

/// Both indexes live under one lock so they can never disagree.
#[derive(Default)]
struct Indexes {
    /// source -> destination -> bucket
    routes: HashMap<AirportCode, HashMap<AirportCode, RouteBucket>>,
    by_id: HashMap<ItineraryId, Arc<Itinerary>>,
}

impl Indexes {
    fn bucket(&self, source: &AirportCode, destination: &AirportCode) -> Option<&RouteBucket> {
        self.routes.get(source)?.get(destination)
    }
}

/// [`ItineraryStore`] kept entirely in process memory.
#[derive(Default)]
pub struct MemoryStore {
    indexes: RwLock<Indexes>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct routes with at least one itinerary.
    pub fn route_count(&self) -> usize {
        self.read().routes.values().map(HashMap::len).sum()
    }

    // Poisoning is ignored: both indexes are written before any selection.
    fn read(&self) -> RwLockReadGuard<'_, Indexes> {
        self.indexes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Indexes> {
        self.indexes.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ItineraryStore for MemoryStore {
    fn insert(&self, mut itinerary: Itinerary) -> Option<ItineraryId> {
        let mut indexes = self.write();

        let (source, destination) = itinerary.route()?;
        let id = ItineraryId::new();
        itinerary.id = Some(id);
        let itinerary = Arc::new(itinerary);

        // Indexed by id before the bucket runs any comparison.
        indexes.by_id.insert(id, Arc::clone(&itinerary));
        indexes
            .routes
            .entry(source)
            .or_default()
            .entry(destination)
            .or_default()
            .push(itinerary);

        Some(id)
    }

    fn itineraries(&self, source: &AirportCode, destination: &AirportCode) -> Vec<Arc<Itinerary>> {
        self.read()
            .bucket(source, destination)
            .map(|bucket| bucket.itineraries().to_vec())
            .unwrap_or_default()
    }

    fn best(
        &self,
        criterion: Criterion,
        source: &AirportCode,
        destination: &AirportCode,
    ) -> Option<Arc<Itinerary>> {
        self.read()
            .bucket(source, destination)?
            .best(criterion)
            .cloned()
    }

    fn get(&self, id: ItineraryId) -> Result<Arc<Itinerary>, StoreError> {
        self.read()
            .by_id
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn len(&self) -> usize {
        self.read().by_id.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::testing::{code, itinerary, via_delhi, via_guangzhou};
    use std::collections::HashSet;
    use std::thread;

    fn dxb_bkk() -> (AirportCode, AirportCode) {
        (code("DXB"), code("BKK"))
    }

    #[test]
    fn insert_assigns_distinct_ids() {
        let store = MemoryStore::new();
        let a = store.insert(via_delhi()).unwrap();
        let b = store.insert(via_delhi()).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(a).unwrap().id, Some(a));
    }

    #[test]
    fn dubai_to_bangkok_scenario() {
        let store = MemoryStore::new();
        let delhi = store.insert(via_delhi()).unwrap();
        let guangzhou = store.insert(via_guangzhou()).unwrap();
        let (src, dst) = dxb_bkk();

        let ids: Vec<_> = store
            .itineraries(&src, &dst)
            .iter()
            .map(|i| i.id.unwrap())
            .collect();
        assert_eq!(ids, vec![delhi, guangzhou]);

        let best = |c| store.best(c, &src, &dst).and_then(|i| i.id);
        assert_eq!(best(Criterion::Cheapest), Some(guangzhou));
        assert_eq!(best(Criterion::MostExpensive), Some(delhi));
        assert_eq!(best(Criterion::Shortest), Some(guangzhou));
        assert_eq!(best(Criterion::Longest), Some(delhi));
        assert_eq!(best(Criterion::Optimal), Some(guangzhou));
    }

    #[test]
    fn itinerary_without_segments_is_dropped() {
        let store = MemoryStore::new();
        assert_eq!(store.insert(Itinerary::default()), None);
        assert!(store.is_empty());
        assert_eq!(store.route_count(), 0);
    }

    #[test]
    fn unknown_route_is_empty() {
        let store = MemoryStore::new();
        store.insert(via_delhi());
        let (src, dst) = dxb_bkk();

        assert!(store.itineraries(&dst, &src).is_empty());
        assert!(store.itineraries(&src, &code("DEL")).is_empty());
        for criterion in Criterion::ALL {
            assert!(store.best(criterion, &dst, &src).is_none());
        }
    }

    #[test]
    fn unknown_id_is_not_found() {
        let store = MemoryStore::new();
        store.insert(via_delhi());
        let id = ItineraryId::new();
        assert_eq!(store.get(id), Err(StoreError::NotFound(id)));
    }

    #[test]
    fn route_is_created_once() {
        let store = MemoryStore::new();
        store.insert(via_delhi());
        store.insert(via_guangzhou());
        store.insert(itinerary(
            &[("BKK", "DXB", "2018-10-30T0100", "2018-10-30T0700")],
            20000,
        ));
        assert_eq!(store.route_count(), 2);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn filed_under_first_source_and_last_destination() {
        let store = MemoryStore::new();
        store.insert(via_delhi());
        assert!(store.itineraries(&code("DXB"), &code("DEL")).is_empty());
        assert!(store.itineraries(&code("DEL"), &code("BKK")).is_empty());
        assert_eq!(store.itineraries(&code("DXB"), &code("BKK")).len(), 1);
    }

    #[test]
    fn concurrent_inserts_keep_indexes_consistent() {
        let store = Arc::new(MemoryStore::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    (0..50)
                        .filter_map(|n| {
                            let item = if (t + n) % 2 == 0 {
                                via_delhi()
                            } else {
                                via_guangzhou()
                            };
                            store.insert(item)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.extend(handle.join().unwrap());
        }

        assert_eq!(ids.len(), 400);
        assert_eq!(store.len(), 400);

        let (src, dst) = dxb_bkk();
        let routed: HashSet<_> = store
            .itineraries(&src, &dst)
            .iter()
            .map(|i| i.id.unwrap())
            .collect();
        assert_eq!(routed, ids);
        for id in &ids {
            assert_eq!(store.get(*id).unwrap().id, Some(*id));
        }

        let cheapest = store.best(Criterion::Cheapest, &src, &dst).unwrap();
        assert_eq!(cheapest.total_price(), via_guangzhou().total_price());
        let longest = store.best(Criterion::Longest, &src, &dst).unwrap();
        assert_eq!(longest.total_duration(), via_delhi().total_duration());
    }

    #[test]
    fn feed_case_does_not_split_routes() {
        let store = MemoryStore::new();
        let upper = store.insert(via_delhi()).unwrap();
        let mut lower = via_guangzhou();
        lower.onward[0].source = AirportCode::new("dxb");
        let lower = store.insert(lower).unwrap();

        let (src, dst) = dxb_bkk();
        let ids: Vec<_> = store
            .itineraries(&src, &dst)
            .iter()
            .map(|i| i.id.unwrap())
            .collect();
        assert_eq!(ids, vec![upper, lower]);
        assert_eq!(store.route_count(), 1);
    }

    #[test]
    fn panicking_comparison_leaves_indexes_consistent() {
        use chrono::NaiveDate;
        use crate::domain::{FlightTime, Segment};
        use std::panic::{AssertUnwindSafe, catch_unwind};

        let store = MemoryStore::new();
        let first = store.insert(via_delhi()).unwrap();

        // Enough min-to-max legs that summing flight time overflows.
        let leg = Segment {
            departure: FlightTime::new(NaiveDate::MIN.and_hms_opt(0, 0, 0).unwrap()),
            arrival: FlightTime::new(NaiveDate::MAX.and_hms_opt(0, 0, 0).unwrap()),
            ..via_delhi().onward[0].clone()
        };
        let mut extreme = via_delhi();
        extreme.onward = vec![leg; 1000];
        extreme.onward.last_mut().unwrap().destination = code("BKK");

        let result = catch_unwind(AssertUnwindSafe(|| store.insert(extreme)));
        assert!(result.is_err());

        let (src, dst) = dxb_bkk();
        let listed = store.itineraries(&src, &dst);
        assert_eq!(listed.len(), 2);
        assert_eq!(store.len(), 2);
        for itinerary in &listed {
            let id = itinerary.id.unwrap();
            assert_eq!(store.get(id).unwrap().id, Some(id));
        }
        for criterion in Criterion::ALL {
            let best = store.best(criterion, &src, &dst).unwrap();
            let id = best.id.unwrap();
            assert!(store.get(id).is_ok(), "{criterion}");
            assert!(listed.iter().any(|i| i.id == Some(id)), "{criterion}");
        }
        assert_eq!(listed[0].id, Some(first));

        // The lock is still usable afterwards.
        assert!(store.insert(via_guangzhou()).is_some());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn usable_as_trait_object() {
        let store: Arc<dyn ItineraryStore> = Arc::new(MemoryStore::new());
        let id = store.insert(via_guangzhou()).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get(id).is_ok());
    }
}
