//! # Runtime Scenarios
//!
//! The `Stockroom` container as the CLI uses it: open from configuration,
//! operate, reset, reopen. With `--features rocksdb` the same flows run
//! against a store on disk.

#[cfg(test)]
mod tests {
    use inventory_engine::test_utils::{delivery_date, money, operator};
    use inventory_engine::*;
    use inventory_runtime::{RuntimeConfig, Stockroom};
    use shared_types::{DeliveryId, IdentifierId, TrackingMode};

    /// Create a widget entry and a booked delivery of two units, one damaged.
    fn receive_widgets(stockroom: &Stockroom) -> (DeliveryId, Vec<IdentifierId>) {
        let service = stockroom.service();
        let widget = service
            .create_catalog_entry(NewCatalogEntry::new("Widget", TrackingMode::Serial))
            .unwrap();
        let delivery = service
            .create_delivery(NewDelivery {
                delivery_date: delivery_date(),
                supplier: None,
            })
            .unwrap();
        let ids = service
            .add_delivery_line(AddDeliveryLineRequest {
                delivery_id: delivery.id,
                catalog_entry_id: widget.id,
                quantity: 2,
                unit_price: money("100.00"),
                seeds: vec![TrackedUnitSeed::serial("A1"), TrackedUnitSeed::serial("A2")],
            })
            .unwrap()
            .created_identifiers;
        service
            .submit_damage_assessment(DamageAssessmentRequest {
                delivery_id: delivery.id,
                decisions: vec![
                    DamageDecision::intact(ids[0]),
                    DamageDecision::damaged(ids[1], "cracked screen"),
                ],
                actor: stockroom.operator(),
            })
            .unwrap();
        (delivery.id, ids)
    }

    #[test]
    fn test_reset_restarts_numbering() {
        let stockroom = Stockroom::open(RuntimeConfig::default()).unwrap();
        receive_widgets(&stockroom);

        stockroom.reset().unwrap();

        let service = stockroom.service();
        assert!(service.stock_overview().unwrap().is_empty());
        assert!(service.list_deliveries().unwrap().is_empty());
        let delivery = service
            .create_delivery(NewDelivery {
                delivery_date: delivery_date(),
                supplier: None,
            })
            .unwrap();
        assert_eq!(delivery.delivery_number, "WS0001");
    }

    #[test]
    fn test_configured_operator_lands_on_audit_rows() {
        let config = RuntimeConfig {
            operator: operator(),
            ..Default::default()
        };
        let stockroom = Stockroom::open(config).unwrap();

        let (_, ids) = receive_widgets(&stockroom);

        let detail = stockroom.service().identifier_detail(ids[0]).unwrap();
        assert_eq!(detail.status_history[0].actor, operator());
    }

    #[cfg(feature = "rocksdb")]
    mod durable {
        use super::*;
        use inventory_runtime::{RuntimeError, StoreKind};
        use shared_types::IdentifierStatus;
        use tempfile::TempDir;

        fn config(dir: &TempDir) -> RuntimeConfig {
            RuntimeConfig {
                data_dir: dir.path().to_path_buf(),
                store: StoreKind::RocksDb,
                sync_writes: false,
                ..Default::default()
            }
        }

        #[test]
        fn test_ledger_survives_restart() {
            let dir = TempDir::new().unwrap();
            let (delivery_id, ids) = {
                let stockroom = Stockroom::open(config(&dir)).unwrap();
                receive_widgets(&stockroom)
            };

            let stockroom = Stockroom::open(config(&dir)).unwrap();
            let service = stockroom.service();

            let damaged = service.identifier_detail(ids[1]).unwrap();
            assert_eq!(damaged.identifier.status, IdentifierStatus::DefectiveAtDelivery);
            assert_eq!(damaged.status_history.len(), 1);
            let detail = service.delivery_detail(delivery_id).unwrap();
            assert_eq!(detail.lines[0].units.len(), 2);

            // sequences continue after the restart
            let next = service
                .create_delivery(NewDelivery {
                    delivery_date: delivery_date(),
                    supplier: None,
                })
                .unwrap();
            assert_eq!(next.delivery_number, "WS0002");
        }

        #[test]
        fn test_reopen_in_place_keeps_records() {
            let dir = TempDir::new().unwrap();
            let stockroom = Stockroom::open(config(&dir)).unwrap();
            let (_, ids) = receive_widgets(&stockroom);

            stockroom.reopen().unwrap();

            let listing = stockroom
                .service()
                .list_identifiers(&IdentifierFilter::default())
                .unwrap();
            assert_eq!(listing.len(), ids.len());
        }

        #[test]
        fn test_second_stockroom_on_same_directory_refused() {
            let dir = TempDir::new().unwrap();
            let _first = Stockroom::open(config(&dir)).unwrap();

            let second = Stockroom::open(config(&dir));

            assert!(matches!(second, Err(RuntimeError::Lock(_))));
        }
    }
}
