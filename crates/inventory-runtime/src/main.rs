//! Stockroom: operator CLI for the inventory engine.
//!
//! Every command opens the configured store, runs one operation and prints
//! its result as JSON on stdout. Logs go to stderr.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::warn;

use inventory_engine::{
    AddDeliveryLineRequest, AdjustBulkStockRequest, ChangeCatalogEntryRequest,
    ChangeIdentifierValueRequest, ChangeStatusRequest, DamageAssessmentRequest, DamageDecision,
    DispositionAction, DispositionRequest, IdentifierFilter, InventoryApi, InventoryError,
    NewCatalogEntry, NewDelivery, ToggleClearanceRequest, TrackedUnitSeed,
    UpdateCatalogEntryRequest,
};
use inventory_runtime::{RuntimeConfig, Stockroom, StoreKind};
use inventory_telemetry::{encode_metrics, init_telemetry, TelemetryConfig};
use shared_types::{
    Actor, CatalogEntryId, DeliveryId, IdentifierId, IdentifierStatus, Money, TrackingMode,
};

/// Stockroom: inventory for tracked devices and bulk accessories
#[derive(Parser, Debug)]
#[command(name = "stockroom")]
#[command(about = "Inventory state machine and audit ledger for mobile retail")]
struct Cli {
    /// Data directory (overrides STOCKROOM_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Store backend: memory or rocksdb (overrides STOCKROOM_STORE)
    #[arg(long, global = true)]
    store: Option<StoreKind>,

    /// Operator recorded on audit rows (overrides STOCKROOM_OPERATOR)
    #[arg(long, global = true)]
    operator: Option<String>,

    /// Log level filter (overrides STOCKROOM_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print Prometheus metrics to stderr after the command
    #[arg(long, global = true)]
    print_metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Catalog entries and stock levels
    #[command(subcommand)]
    Catalog(CatalogCommand),

    /// Deliveries: intake, booking and damage assessment
    #[command(subcommand)]
    Delivery(DeliveryCommand),

    /// Tracked units: status, identity, clearance and disposition
    #[command(subcommand)]
    Unit(UnitCommand),

    /// Delete every record in the store
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Create a catalog entry
    Add {
        name: String,
        /// none, imei or serial
        #[arg(long, default_value = "none")]
        mode: TrackingMode,
        #[arg(long)]
        ean: Option<String>,
    },
    /// Rename an entry or change its EAN
    Update {
        id: u64,
        name: String,
        #[arg(long)]
        ean: Option<String>,
    },
    /// Stock overview of every entry
    List,
    /// Entry detail with its units or bulk history
    Show { id: u64 },
    /// Apply a signed change to a bulk entry's quantity
    Adjust {
        id: u64,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
        #[arg(long)]
        note: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum DeliveryCommand {
    /// Open a concept delivery
    Create {
        /// Delivery date (YYYY-MM-DD)
        date: NaiveDate,
        #[arg(long)]
        supplier: Option<String>,
    },
    /// Register a line and receive its units
    AddLine(AddLineArgs),
    /// Book a delivery, or list the units awaiting assessment
    Book { id: u64 },
    /// Submit damage decisions and book the delivery
    Assess(AssessArgs),
    List,
    Show { id: u64 },
}

#[derive(Args, Debug)]
struct AddLineArgs {
    delivery: u64,
    entry: u64,
    quantity: i64,
    price: Money,
    /// IMEI or serial of one received unit (repeat per unit)
    #[arg(long = "unit")]
    units: Vec<String>,
}

#[derive(Args, Debug)]
struct AssessArgs {
    delivery: u64,
    /// Units arriving intact
    #[arg(long, value_delimiter = ',')]
    intact: Vec<u64>,
    /// Damaged unit as ID=DESCRIPTION (repeatable)
    #[arg(long, value_parser = parse_damage)]
    damaged: Vec<(u64, String)>,
}

#[derive(Subcommand, Debug)]
enum UnitCommand {
    /// Search units
    List {
        /// Substring of the IMEI or serial
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        entry: Option<u64>,
        #[arg(long)]
        status: Option<IdentifierStatus>,
        #[arg(long)]
        clearance: bool,
    },
    /// Unit with its full history
    Show { id: u64 },
    /// Move a unit to another status
    Status {
        id: u64,
        status: IdentifierStatus,
        /// Only apply while the unit still has this status
        #[arg(long)]
        expect: Option<IdentifierStatus>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Correct the IMEI or serial of an in-stock unit
    Retag {
        id: u64,
        #[arg(long)]
        imei: Option<String>,
        #[arg(long)]
        serial: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Move an in-stock unit to another catalog entry
    Move {
        id: u64,
        entry: u64,
        #[arg(long)]
        note: Option<String>,
    },
    /// Toggle the clearance flag of an in-stock unit
    Clearance {
        id: u64,
        #[arg(long)]
        price: Option<Money>,
        #[arg(long)]
        reason: Option<String>,
        /// Clear the flag instead of toggling
        #[arg(long)]
        remove: bool,
        #[arg(long)]
        note: Option<String>,
    },
    /// Resolve units damaged at delivery
    Dispose {
        #[arg(required = true, value_delimiter = ',')]
        ids: Vec<u64>,
        /// return_to_supplier, mark_as_clearance or write_off
        #[arg(long)]
        action: String,
        #[arg(long)]
        price: Option<Money>,
        #[arg(long)]
        reason: Option<String>,
    },
    /// In-stock units flagged for clearance
    ClearanceList,
}

fn parse_damage(value: &str) -> Result<(u64, String), String> {
    let (id, description) = value
        .split_once('=')
        .ok_or_else(|| format!("expected ID=DESCRIPTION, got '{}'", value))?;
    let id = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid unit id '{}'", id))?;
    Ok((id, description.trim().to_string()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if let Some(level) = &cli.log_level {
        telemetry = telemetry.with_log_level(level.clone());
    }
    let _guard = init_telemetry(telemetry).context("failed to initialize telemetry")?;

    let mut config = RuntimeConfig::from_env().context("invalid STOCKROOM_* configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(store) = cli.store {
        config.store = store;
    }
    if let Some(operator) = cli.operator.as_deref() {
        config.operator = Actor::operator_or_default(Some(operator));
    }

    let stockroom = Stockroom::open(config).context("failed to open the stockroom")?;
    let result = run(&stockroom, cli.command);

    if cli.print_metrics {
        eprintln!("{}", encode_metrics().context("failed to encode metrics")?);
    }
    result
}

fn run(stockroom: &Stockroom, command: Command) -> Result<()> {
    match command {
        Command::Catalog(command) => run_catalog(stockroom, command),
        Command::Delivery(command) => run_delivery(stockroom, command),
        Command::Unit(command) => run_unit(stockroom, command),
        Command::Reset { yes } => {
            if !yes {
                bail!("refusing to reset without --yes");
            }
            stockroom.reset().context("reset failed")?;
            print_json(&serde_json::json!({ "reset": true }))
        }
    }
}

fn run_catalog(stockroom: &Stockroom, command: CatalogCommand) -> Result<()> {
    let service = stockroom.service();
    match command {
        CatalogCommand::Add { name, mode, ean } => {
            let request = NewCatalogEntry {
                name,
                ean,
                tracking_mode: mode,
            };
            print_json(&checked("create catalog entry", service.create_catalog_entry(request))?)
        }
        CatalogCommand::Update { id, name, ean } => {
            let current = checked(
                "load catalog entry",
                service.catalog_entry_detail(CatalogEntryId(id)),
            )?;
            let request = UpdateCatalogEntryRequest {
                id: CatalogEntryId(id),
                name,
                ean,
                tracking_mode: current.entry.tracking_mode,
            };
            print_json(&checked("update catalog entry", service.update_catalog_entry(request))?)
        }
        CatalogCommand::List => print_json(&checked("stock overview", service.stock_overview())?),
        CatalogCommand::Show { id } => print_json(&checked(
            "catalog entry detail",
            service.catalog_entry_detail(CatalogEntryId(id)),
        )?),
        CatalogCommand::Adjust { id, delta, note } => {
            let request = AdjustBulkStockRequest {
                catalog_entry_id: CatalogEntryId(id),
                delta,
                actor: stockroom.operator(),
                note,
            };
            print_json(&checked("adjust bulk stock", service.adjust_bulk_stock(request))?)
        }
    }
}

fn run_delivery(stockroom: &Stockroom, command: DeliveryCommand) -> Result<()> {
    let service = stockroom.service();
    match command {
        DeliveryCommand::Create { date, supplier } => {
            let request = NewDelivery {
                delivery_date: date,
                supplier,
            };
            print_json(&checked("create delivery", service.create_delivery(request))?)
        }
        DeliveryCommand::AddLine(args) => {
            let entry = checked(
                "load catalog entry",
                service.catalog_entry_detail(CatalogEntryId(args.entry)),
            )?
            .entry;
            let seeds = args
                .units
                .into_iter()
                .map(|value| match entry.tracking_mode {
                    TrackingMode::Imei => TrackedUnitSeed::imei(value),
                    _ => TrackedUnitSeed::serial(value),
                })
                .collect();
            let request = AddDeliveryLineRequest {
                delivery_id: DeliveryId(args.delivery),
                catalog_entry_id: entry.id,
                quantity: args.quantity,
                unit_price: args.price,
                seeds,
            };
            print_json(&checked("add delivery line", service.add_delivery_line(request))?)
        }
        DeliveryCommand::Book { id } => {
            print_json(&checked("book delivery", service.book_delivery(DeliveryId(id)))?)
        }
        DeliveryCommand::Assess(args) => {
            let decisions = args
                .intact
                .into_iter()
                .map(|id| DamageDecision::intact(IdentifierId(id)))
                .chain(
                    args.damaged
                        .into_iter()
                        .map(|(id, description)| DamageDecision::damaged(IdentifierId(id), description)),
                )
                .collect();
            let request = DamageAssessmentRequest {
                delivery_id: DeliveryId(args.delivery),
                decisions,
                actor: stockroom.operator(),
            };
            print_json(&checked(
                "submit damage assessment",
                service.submit_damage_assessment(request),
            )?)
        }
        DeliveryCommand::List => print_json(&checked("list deliveries", service.list_deliveries())?),
        DeliveryCommand::Show { id } => print_json(&checked(
            "delivery detail",
            service.delivery_detail(DeliveryId(id)),
        )?),
    }
}

fn run_unit(stockroom: &Stockroom, command: UnitCommand) -> Result<()> {
    let service = stockroom.service();
    match command {
        UnitCommand::List {
            search,
            entry,
            status,
            clearance,
        } => {
            let filter = IdentifierFilter {
                search,
                catalog_entry_id: entry.map(CatalogEntryId),
                status,
                clearance_only: clearance,
            };
            print_json(&checked("list units", service.list_identifiers(&filter))?)
        }
        UnitCommand::Show { id } => print_json(&checked(
            "unit detail",
            service.identifier_detail(IdentifierId(id)),
        )?),
        UnitCommand::Status {
            id,
            status,
            expect,
            note,
        } => {
            let mut request = ChangeStatusRequest::new(IdentifierId(id), status, stockroom.operator());
            request.expected_current = expect;
            request.note = note;
            print_json(&checked("change status", service.change_status(request))?)
        }
        UnitCommand::Retag {
            id,
            imei,
            serial,
            note,
        } => {
            let request = ChangeIdentifierValueRequest {
                identifier_id: IdentifierId(id),
                new_imei: imei,
                new_serial_number: serial,
                actor: stockroom.operator(),
                note,
            };
            print_json(&checked(
                "change identifier value",
                service.change_identifier_value(request),
            )?)
        }
        UnitCommand::Move { id, entry, note } => {
            let request = ChangeCatalogEntryRequest {
                identifier_id: IdentifierId(id),
                new_catalog_entry_id: CatalogEntryId(entry),
                actor: stockroom.operator(),
                note,
            };
            print_json(&checked("change catalog entry", service.change_catalog_entry(request))?)
        }
        UnitCommand::Clearance {
            id,
            price,
            reason,
            remove,
            note,
        } => {
            let request = ToggleClearanceRequest {
                identifier_id: IdentifierId(id),
                price,
                reason,
                remove,
                actor: stockroom.operator(),
                note,
            };
            print_json(&checked("toggle clearance", service.toggle_clearance(request))?)
        }
        UnitCommand::Dispose {
            ids,
            action,
            price,
            reason,
        } => {
            let action: DispositionAction = checked("parse action", action.parse())?;
            let request = DispositionRequest {
                identifier_ids: ids.into_iter().map(IdentifierId).collect(),
                action,
                actor: stockroom.operator(),
                clearance_price: price,
                clearance_reason: reason,
            };
            print_json(&checked(
                "disposition damaged units",
                service.disposition_damaged_units(request),
            )?)
        }
        UnitCommand::ClearanceList => {
            print_json(&checked("list clearance", service.list_clearance())?)
        }
    }
}

/// Log a rejected operation with its error kind and attach the operation name.
fn checked<T>(operation: &str, result: Result<T, InventoryError>) -> Result<T> {
    result.map_err(|e| {
        warn!(
            "[stockroom] {} rejected ({}): {}",
            operation,
            e.kind().as_str(),
            e
        );
        anyhow::Error::new(e).context(format!("{} rejected", operation))
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{}", rendered);
    Ok(())
}
