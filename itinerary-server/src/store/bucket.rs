//! Per-route itinerary list with running selections.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::Itinerary;

use super::Criterion;

/// All itineraries seen for one route plus the current pick for each
/// [`Criterion`].
///
/// Selections are updated pairwise on every push: the newcomer is compared
/// with the current holder only, never with the whole list.
#[derive(Debug, Default)]
pub struct RouteBucket {
    itineraries: Vec<Arc<Itinerary>>,
    cheapest: Option<Arc<Itinerary>>,
    most_expensive: Option<Arc<Itinerary>>,
    shortest: Option<Arc<Itinerary>>,
    longest: Option<Arc<Itinerary>>,
    optimal: Option<Arc<Itinerary>>,
}

impl RouteBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an itinerary and update every selection.
    ///
    /// The itinerary is listed before any selection is compared, so a
    /// selection only ever points at a listed itinerary.
    pub fn push(&mut self, itinerary: Arc<Itinerary>) {
        self.itineraries.push(Arc::clone(&itinerary));
        for criterion in Criterion::ALL {
            let slot = self.slot_mut(criterion);
            let replace = match slot.as_deref() {
                None => true,
                Some(holder) => prefers(criterion, holder, &itinerary),
            };
            if replace {
                *slot = Some(Arc::clone(&itinerary));
            }
        }
    }

    /// Itineraries in insertion order.
    pub fn itineraries(&self) -> &[Arc<Itinerary>] {
        &self.itineraries
    }

    pub fn best(&self, criterion: Criterion) -> Option<&Arc<Itinerary>> {
        match criterion {
            Criterion::Cheapest => self.cheapest.as_ref(),
            Criterion::MostExpensive => self.most_expensive.as_ref(),
            Criterion::Shortest => self.shortest.as_ref(),
            Criterion::Longest => self.longest.as_ref(),
            Criterion::Optimal => self.optimal.as_ref(),
        }
    }

    pub fn len(&self) -> usize {
        self.itineraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itineraries.is_empty()
    }

    fn slot_mut(&mut self, criterion: Criterion) -> &mut Option<Arc<Itinerary>> {
        match criterion {
            Criterion::Cheapest => &mut self.cheapest,
            Criterion::MostExpensive => &mut self.most_expensive,
            Criterion::Shortest => &mut self.shortest,
            Criterion::Longest => &mut self.longest,
            Criterion::Optimal => &mut self.optimal,
        }
    }
}

/// Whether `candidate` should replace `holder` under `criterion`.
///
/// Equal values keep the holder.
pub fn prefers(criterion: Criterion, holder: &Itinerary, candidate: &Itinerary) -> bool {
    match criterion {
        Criterion::Cheapest => candidate.total_price() < holder.total_price(),
        Criterion::MostExpensive => candidate.total_price() > holder.total_price(),
        Criterion::Shortest => candidate.total_duration() < holder.total_duration(),
        Criterion::Longest => candidate.total_duration() > holder.total_duration(),
        Criterion::Optimal => more_optimal(holder, candidate),
    }
}

/// Seconds in the air per unit of price; zero for free or unpriced trips.
pub fn value_ratio(itinerary: &Itinerary) -> Decimal {
    let price = itinerary.total_price();
    if price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    Decimal::from(itinerary.flight_duration().num_seconds())
        .checked_div(price)
        .unwrap_or(Decimal::ZERO)
}

/// Four-point contest between holder and candidate.
///
/// The holder takes a point only where it is strictly better; every other
/// point goes to the candidate. The candidate needs a strict majority.
fn more_optimal(holder: &Itinerary, candidate: &Itinerary) -> bool {
    let holder_points = [
        value_ratio(holder) > value_ratio(candidate),
        holder.total_price() < candidate.total_price(),
        holder.flight_duration() < candidate.flight_duration(),
        holder.transfer_duration() < candidate.transfer_duration(),
    ]
    .into_iter()
    .filter(|&won| won)
    .count();

    let candidate_points = 4 - holder_points;
    candidate_points > holder_points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::testing::{itinerary, via_delhi, via_guangzhou};

    fn push_all(items: Vec<Itinerary>) -> (RouteBucket, Vec<Arc<Itinerary>>) {
        let mut bucket = RouteBucket::new();
        let items: Vec<Arc<Itinerary>> = items.into_iter().map(Arc::new).collect();
        for item in &items {
            bucket.push(Arc::clone(item));
        }
        (bucket, items)
    }

    fn is(bucket: &RouteBucket, criterion: Criterion, expected: &Arc<Itinerary>) -> bool {
        bucket
            .best(criterion)
            .is_some_and(|held| Arc::ptr_eq(held, expected))
    }

    /// One-leg DXB-BKK flight leaving at 00:00 on the 1st.
    fn direct(hours: u32, cents: i64) -> Itinerary {
        let arrival = format!("2018-10-01T{hours:02}00");
        itinerary(&[("DXB", "BKK", "2018-10-01T0000", arrival.as_str())], cents)
    }

    #[test]
    fn empty_bucket_has_no_selections() {
        let bucket = RouteBucket::new();
        assert!(bucket.is_empty());
        for criterion in Criterion::ALL {
            assert!(bucket.best(criterion).is_none());
        }
    }

    #[test]
    fn first_itinerary_holds_every_selection() {
        let (bucket, items) = push_all(vec![via_delhi()]);
        for criterion in Criterion::ALL {
            assert!(is(&bucket, criterion, &items[0]), "{criterion}");
        }
    }

    #[test]
    fn dubai_to_bangkok_selections() {
        let (bucket, items) = push_all(vec![via_delhi(), via_guangzhou()]);
        let (delhi, guangzhou) = (&items[0], &items[1]);

        assert_eq!(bucket.len(), 2);
        assert!(is(&bucket, Criterion::Cheapest, guangzhou));
        assert!(is(&bucket, Criterion::MostExpensive, delhi));
        assert!(is(&bucket, Criterion::Shortest, guangzhou));
        assert!(is(&bucket, Criterion::Longest, delhi));
        assert!(is(&bucket, Criterion::Optimal, guangzhou));
    }

    #[test]
    fn dubai_to_bangkok_optimal_in_either_order() {
        let (bucket, items) = push_all(vec![via_guangzhou(), via_delhi()]);
        assert!(is(&bucket, Criterion::Optimal, &items[0]));
        assert!(is(&bucket, Criterion::Cheapest, &items[0]));
        assert!(is(&bucket, Criterion::Longest, &items[1]));
    }

    #[test]
    fn ties_keep_the_holder() {
        let (bucket, items) = push_all(vec![direct(5, 10000), direct(5, 10000)]);
        for criterion in [
            Criterion::Cheapest,
            Criterion::MostExpensive,
            Criterion::Shortest,
            Criterion::Longest,
        ] {
            assert!(is(&bucket, criterion, &items[0]), "{criterion}");
        }
    }

    #[test]
    fn optimal_identical_candidate_takes_over() {
        // The holder is strictly better at nothing, so every point goes to
        // the candidate.
        let (bucket, items) = push_all(vec![direct(5, 10000), direct(5, 10000)]);
        assert!(is(&bucket, Criterion::Optimal, &items[1]));
    }

    #[test]
    fn optimal_two_all_keeps_holder() {
        // Holder 4h at 100.00 (ratio 144) wins ratio and price; candidate
        // 2h at 200.00 (ratio 36) wins flight time and the tied transfer.
        let (bucket, items) = push_all(vec![direct(4, 10000), direct(2, 20000)]);
        assert!(is(&bucket, Criterion::Optimal, &items[0]));
    }

    #[test]
    fn optimal_majority_replaces_holder() {
        // Holder 4h at 200.00 (ratio 72) wins nothing against 2h at 50.00
        // (ratio 144).
        let (bucket, items) = push_all(vec![direct(4, 20000), direct(2, 5000)]);
        assert!(is(&bucket, Criterion::Optimal, &items[1]));
    }

    #[test]
    fn optimal_three_one_keeps_holder() {
        // Holder 2h at 50.00 (ratio 144) wins ratio, price and flight time.
        let (bucket, items) = push_all(vec![direct(2, 5000), direct(4, 20000)]);
        assert!(is(&bucket, Criterion::Optimal, &items[0]));
    }

    #[test]
    fn value_ratio_of_unpriced_trip_is_zero() {
        let mut free = direct(3, 0);
        assert_eq!(value_ratio(&free), Decimal::ZERO);
        free.pricing = None;
        assert_eq!(value_ratio(&free), Decimal::ZERO);
        assert_eq!(value_ratio(&direct(1, 3600)), Decimal::from(100));
    }

    #[test]
    fn unpriced_itinerary_counts_as_zero_cost() {
        let mut unpriced = direct(3, 0);
        unpriced.pricing = None;
        let (bucket, items) = push_all(vec![direct(3, 100), unpriced]);
        assert!(is(&bucket, Criterion::Cheapest, &items[1]));
        assert!(is(&bucket, Criterion::MostExpensive, &items[0]));
    }
}
