//! # Shop Day Scenarios
//!
//! A delivery arrives with phones and accessories, one phone turns out to be
//! damaged, it is sold off through clearance, and the remaining stock moves
//! around the catalog. Every step is checked against the read models a
//! front-end would show.

#[cfg(test)]
mod tests {
    use inventory_engine::test_utils::*;
    use inventory_engine::*;
    use shared_types::{DeliveryStatus, IdentifierStatus, TrackingMode};

    const IMEIS: [&str; 3] = ["356938035643809", "356938035643817", "356938035643825"];

    fn stock_of(service: &TestService, name: &str) -> (i64, usize) {
        let line = service
            .stock_overview()
            .unwrap()
            .into_iter()
            .find(|line| line.catalog_entry.name == name)
            .unwrap_or_else(|| panic!("no stock line for {}", name));
        (line.stock, line.total_identifiers)
    }

    #[test]
    fn test_mixed_delivery_through_clearance_sale() {
        let (service, clock) = make_test_service();
        let phone = create_entry(&service, "Phone X 128GB Black", TrackingMode::Imei);
        let phone_blue = create_entry(&service, "Phone X 128GB Blue", TrackingMode::Imei);
        let case = create_entry(&service, "Phone X case", TrackingMode::None);

        // intake
        let delivery = open_delivery(&service);
        assert_eq!(delivery.delivery_number, "WS0001");
        let ids = receive_units(&service, delivery.id, &phone, &IMEIS).created_identifiers;
        let cases = service
            .add_delivery_line(AddDeliveryLineRequest {
                delivery_id: delivery.id,
                catalog_entry_id: case.id,
                quantity: 20,
                unit_price: money("2.50"),
                seeds: Vec::new(),
            })
            .unwrap();
        assert_eq!(cases.bulk_quantity, Some(20));

        // booking asks for an assessment of the three phones
        let BookingOutcome::AssessmentRequired { pending, .. } =
            service.book_delivery(delivery.id).unwrap()
        else {
            panic!("delivery with phones must require assessment");
        };
        assert_eq!(pending.len(), 3);
        assert!(pending.iter().all(|unit| unit.imei.is_some()));

        clock.advance(300);
        let summary = service
            .submit_damage_assessment(DamageAssessmentRequest {
                delivery_id: delivery.id,
                decisions: vec![
                    DamageDecision::intact(ids[0]),
                    DamageDecision::intact(ids[1]),
                    DamageDecision::damaged(ids[2], "cracked screen"),
                ],
                actor: operator(),
            })
            .unwrap();
        assert_eq!((summary.in_stock, summary.damaged), (2, 1));

        let deliveries = service.list_deliveries().unwrap();
        assert_eq!(deliveries[0].delivery.status, DeliveryStatus::Booked);
        assert_eq!(deliveries[0].line_count, 2);
        assert_eq!(deliveries[0].total_quantity, 23);
        assert_eq!(stock_of(&service, "Phone X 128GB Black"), (2, 3));
        assert_eq!(stock_of(&service, "Phone X case").0, 20);

        // the damaged phone goes to clearance
        clock.advance(3600);
        service
            .disposition_damaged_units(DispositionRequest {
                identifier_ids: vec![ids[2]],
                action: DispositionAction::MarkAsClearance,
                actor: operator(),
                clearance_price: Some(money("149.00")),
                clearance_reason: Some("cracked screen".to_string()),
            })
            .unwrap();
        let clearance = service.list_clearance().unwrap();
        assert_eq!(clearance.len(), 1);
        assert_eq!(clearance[0].catalog_entry_name, "Phone X 128GB Black");
        assert_eq!(stock_of(&service, "Phone X 128GB Black"), (3, 3));

        // one intact phone was really the blue version
        service
            .change_catalog_entry(ChangeCatalogEntryRequest {
                identifier_id: ids[1],
                new_catalog_entry_id: phone_blue.id,
                actor: operator(),
                note: Some("wrong colour on the box".to_string()),
            })
            .unwrap();

        // the clearance phone is sold
        service
            .change_status(
                ChangeStatusRequest::new(ids[2], IdentifierStatus::Sold, operator())
                    .expecting(IdentifierStatus::InStock)
                    .with_note("receipt 1042"),
            )
            .unwrap();
        adjust(&service, case.id, -2).unwrap();

        assert!(service.list_clearance().unwrap().is_empty());
        assert_eq!(stock_of(&service, "Phone X 128GB Black"), (1, 2));
        assert_eq!(stock_of(&service, "Phone X 128GB Blue"), (1, 1));
        assert_eq!(stock_of(&service, "Phone X case").0, 18);

        let sold = service.identifier_detail(ids[2]).unwrap();
        let statuses: Vec<_> = sold
            .status_history
            .iter()
            .map(|row| (row.old_status, row.new_status))
            .collect();
        assert_eq!(
            statuses,
            vec![
                (Some(IdentifierStatus::InStock), IdentifierStatus::Sold),
                (
                    Some(IdentifierStatus::DefectiveAtDelivery),
                    IdentifierStatus::InStock
                ),
                (None, IdentifierStatus::DefectiveAtDelivery),
            ]
        );
        assert_eq!(sold.clearance_history.len(), 1);
        assert!(sold.identifier.received_damaged);

        // the delivery still lists the moved phone on its original line
        let detail = service.delivery_detail(delivery.id).unwrap();
        let phone_line = detail
            .lines
            .iter()
            .find(|line| line.catalog_entry_name == "Phone X 128GB Black")
            .unwrap();
        assert_eq!(phone_line.units.len(), 3);
        let swapped: Vec<_> = phone_line
            .units
            .iter()
            .filter(|unit| unit.is_product_version_swapped)
            .map(|unit| unit.identifier.id)
            .collect();
        assert_eq!(swapped, vec![ids[1]]);
    }

    #[test]
    fn test_rejected_operations_leave_state_untouched() {
        let (service, _) = make_test_service();
        let widget = create_entry(&service, "Widget", TrackingMode::Serial);
        let delivery = open_delivery(&service);
        let ids = receive_units(&service, delivery.id, &widget, &["A1", "A2"]).created_identifiers;
        service
            .submit_damage_assessment(DamageAssessmentRequest {
                delivery_id: delivery.id,
                decisions: vec![DamageDecision::intact(ids[0]), DamageDecision::intact(ids[1])],
                actor: operator(),
            })
            .unwrap();
        let before = service.identifier_detail(ids[0]).unwrap();

        // intact units cannot be dispositioned
        let disposed = service.disposition_damaged_units(DispositionRequest {
            identifier_ids: vec![ids[0]],
            action: DispositionAction::WriteOff,
            actor: operator(),
            clearance_price: None,
            clearance_reason: None,
        });
        assert_eq!(disposed.unwrap_err().kind(), ErrorKind::InvalidState);

        // A2 is taken
        let retagged = service.change_identifier_value(ChangeIdentifierValueRequest {
            identifier_id: ids[0],
            new_imei: None,
            new_serial_number: Some("A2".to_string()),
            actor: operator(),
            note: None,
        });
        assert_eq!(retagged.unwrap_err().kind(), ErrorKind::DuplicateIdentifier);

        // zero-priced clearance
        let cleared = service.toggle_clearance(
            ToggleClearanceRequest::toggle(ids[0], operator()).with_price(money("0"), None),
        );
        assert_eq!(cleared.unwrap_err().kind(), ErrorKind::InvalidPrice);

        assert_eq!(service.identifier_detail(ids[0]).unwrap(), before);
    }

    #[test]
    fn test_retagged_unit_is_found_by_new_value() {
        let (service, _) = make_test_service();
        let widget = create_entry(&service, "Widget", TrackingMode::Serial);
        let delivery = open_delivery(&service);
        let ids = receive_units(&service, delivery.id, &widget, &["SN-OLD-1"]).created_identifiers;

        service
            .change_identifier_value(ChangeIdentifierValueRequest {
                identifier_id: ids[0],
                new_imei: None,
                new_serial_number: Some("SN-NEW-1".to_string()),
                actor: operator(),
                note: Some("label misprinted".to_string()),
            })
            .unwrap();

        let by_new = service
            .list_identifiers(&IdentifierFilter {
                search: Some("NEW".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_new.len(), 1);
        assert_eq!(by_new[0].identifier.original_serial_number.as_deref(), Some("SN-OLD-1"));

        let by_old = service
            .list_identifiers(&IdentifierFilter {
                search: Some("OLD".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert!(by_old.is_empty());

        // the old value is free again
        let second = open_delivery(&service);
        let receipt = receive_units(&service, second.id, &widget, &["SN-OLD-1"]);
        assert_eq!(receipt.created_identifiers.len(), 1);
    }

    #[test]
    fn test_accessory_only_delivery_books_without_assessment() {
        let (service, _) = make_test_service();
        let charger = create_entry(&service, "USB-C charger 20W", TrackingMode::None);
        let delivery = open_delivery(&service);
        service
            .add_delivery_line(AddDeliveryLineRequest {
                delivery_id: delivery.id,
                catalog_entry_id: charger.id,
                quantity: 12,
                unit_price: money("9.95"),
                seeds: Vec::new(),
            })
            .unwrap();

        let outcome = service.book_delivery(delivery.id).unwrap();

        assert_eq!(
            outcome,
            BookingOutcome::Booked {
                delivery_id: delivery.id
            }
        );
        let detail = service.delivery_detail(delivery.id).unwrap();
        assert_eq!(detail.delivery.status, DeliveryStatus::Booked);
        assert!(detail.lines[0].units.is_empty());
        let entry = service.catalog_entry_detail(charger.id).unwrap();
        assert_eq!(entry.bulk_quantity, Some(12));
        assert_eq!(entry.recent_bulk_history[0].delta, 12);
    }
}
