//! # Concurrency Scenarios
//!
//! Several tills sharing one service. Transactions serialize, so counters
//! add up and uniqueness holds no matter how calls interleave.

#[cfg(test)]
mod tests {
    use inventory_engine::test_utils::*;
    use inventory_engine::*;
    use shared_types::TrackingMode;
    use std::collections::BTreeSet;
    use std::sync::{Arc, Barrier};
    use std::thread;

    const THREADS: usize = 8;

    fn spawn_all<R, F>(service: &Arc<TestService>, work: F) -> Vec<R>
    where
        R: Send + 'static,
        F: Fn(usize, &TestService) -> R + Send + Sync + 'static,
    {
        let barrier = Arc::new(Barrier::new(THREADS));
        let work = Arc::new(work);
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let service = Arc::clone(service);
                let barrier = Arc::clone(&barrier);
                let work = Arc::clone(&work);
                thread::spawn(move || {
                    barrier.wait();
                    work(i, &service)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    }

    #[test]
    fn test_parallel_bulk_adjustments_add_up() {
        let (service, _) = make_test_service();
        let service = Arc::new(service);
        let cable = create_entry(&*service, "USB-C cable", TrackingMode::None);
        adjust(&*service, cable.id, 100).unwrap();

        // four threads add 2 x 25, four remove 1 x 25; never below zero
        spawn_all(&service, move |i, service| {
            let delta = if i % 2 == 0 { 2 } else { -1 };
            for _ in 0..25 {
                adjust(service, cable.id, delta).unwrap();
            }
        });

        let detail = service.catalog_entry_detail(cable.id).unwrap();
        assert_eq!(detail.bulk_quantity, Some(200));
    }

    #[test]
    fn test_parallel_deliveries_get_distinct_numbers() {
        let (service, _) = make_test_service();
        let service = Arc::new(service);

        let numbers: BTreeSet<String> =
            spawn_all(&service, |_, service| open_delivery(service).delivery_number)
                .into_iter()
                .collect();

        let expected: BTreeSet<String> = (1..=THREADS).map(|n| format!("WS{:04}", n)).collect();
        assert_eq!(numbers, expected);
    }

    #[test]
    fn test_same_serial_received_once_across_tills() {
        let (service, _) = make_test_service();
        let service = Arc::new(service);
        let widget = create_entry(&*service, "Widget", TrackingMode::Serial);

        let results = spawn_all(&service, move |_, service| {
            let delivery = open_delivery(service);
            service.add_delivery_line(AddDeliveryLineRequest {
                delivery_id: delivery.id,
                catalog_entry_id: widget.id,
                quantity: 1,
                unit_price: money("100.00"),
                seeds: vec![TrackedUnitSeed::serial("SN-SHARED")],
            })
        });

        let accepted = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(accepted, 1);
        assert!(results.iter().filter_map(|r| r.as_ref().err()).all(|e| matches!(
            e,
            InventoryError::DuplicateIdentifier {
                field: "serial_number",
                ..
            }
        )));
        let units = service
            .list_identifiers(&IdentifierFilter {
                search: Some("SN-SHARED".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(units.len(), 1);
    }
}
