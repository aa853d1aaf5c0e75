// Canonical column headers for the noon-report table.
//
// Every header string used by the loader, the rules, and the failure
// projection lives here so the rest of the code never repeats a literal.
// The headers match the fleet's reporting template verbatim, including
// the bracketed unit suffixes.

pub const SHIP_NAME: &str = "Ship Name";
pub const IMO_NO: &str = "IMO_No";
pub const REPORT_TYPE: &str = "Report Type";
pub const VOYAGE_NUMBER: &str = "Voyage Number";
pub const TIME_ZONE: &str = "Time Zone";

pub const START_DATE: &str = "Start Date";
pub const START_TIME: &str = "Start Time";
pub const END_DATE: &str = "End Date";
pub const END_TIME: &str = "End Time";
pub const TIME_SHIFT: &str = "Time Shift";

pub const DISTANCE_GROUND: &str = "Distance - Ground [NM]";
pub const DISTANCE_SEA: &str = "Distance - Sea [NM]";

pub const AVG_LOAD_KW: &str = "Average Load [kW]";
pub const AVG_LOAD_PCT: &str = "Average Load [%]";
pub const AVG_RPM: &str = "Average RPM";
pub const AVG_SPEED: &str = "Avg. Speed";
pub const ME_RHRS: &str = "ME Rhrs (From Last Report)";
pub const CYL_OIL_CONS: &str = "Cyl. Oil Cons. [Ltr]";

pub const FUEL_CONS: [&str; 3] = [
    "Fuel Cons. [MT] (ME Cons 1)",
    "Fuel Cons. [MT] (ME Cons 2)",
    "Fuel Cons. [MT] (ME Cons 3)",
];

pub const EXHAUST_TEMP: [&str; 16] = [
    "Exh. Temp [°C] (Main Engine Unit 1)",
    "Exh. Temp [°C] (Main Engine Unit 2)",
    "Exh. Temp [°C] (Main Engine Unit 3)",
    "Exh. Temp [°C] (Main Engine Unit 4)",
    "Exh. Temp [°C] (Main Engine Unit 5)",
    "Exh. Temp [°C] (Main Engine Unit 6)",
    "Exh. Temp [°C] (Main Engine Unit 7)",
    "Exh. Temp [°C] (Main Engine Unit 8)",
    "Exh. Temp [°C] (Main Engine Unit 9)",
    "Exh. Temp [°C] (Main Engine Unit 10)",
    "Exh. Temp [°C] (Main Engine Unit 11)",
    "Exh. Temp [°C] (Main Engine Unit 12)",
    "Exh. Temp [°C] (Main Engine Unit 13)",
    "Exh. Temp [°C] (Main Engine Unit 14)",
    "Exh. Temp [°C] (Main Engine Unit 15)",
    "Exh. Temp [°C] (Main Engine Unit 16)",
];

// Unit 4 reports a total counter rather than a since-last-report figure;
// the heterogeneous names come straight from the reporting template.
pub const AE_RHRS: [&str; 6] = [
    "A.E. 1 Last Report [Rhrs] (Aux Engine Unit 1)",
    "A.E. 2 Last Report [Rhrs] (Aux Engine Unit 2)",
    "A.E. 3 Last Report [Rhrs] (Aux Engine Unit 3)",
    "A.E. 4 Total [Rhrs] (Aux Engine Unit 4)",
    "A.E. 5 Last Report [Rhrs] (Aux Engine Unit 5)",
    "A.E. 6 Last Report [Rhrs] (Aux Engine Unit 6)",
];

pub const SUB_CONSUMERS: [&str; 10] = [
    "Tank Cleaning [MT]",
    "Cargo Transfer [MT]",
    "Maintaining Cargo Temp. [MT]",
    "Shaft Gen. Propulsion [MT]",
    "Raising Cargo Temp. [MT]",
    "Burning Sludge [MT]",
    "Ballast Transfer [MT]",
    "Fresh Water Prod. [MT]",
    "Others [MT]",
    "EGCS Consumption [MT]",
];

/// All source columns the engine understands, in template order. The
/// loader uses this to split known headers from extras it passes over.
pub fn known_columns() -> Vec<&'static str> {
    let mut cols = vec![
        SHIP_NAME,
        IMO_NO,
        REPORT_TYPE,
        VOYAGE_NUMBER,
        TIME_ZONE,
        START_DATE,
        START_TIME,
        END_DATE,
        END_TIME,
        TIME_SHIFT,
        DISTANCE_GROUND,
        DISTANCE_SEA,
        AVG_LOAD_KW,
        AVG_LOAD_PCT,
        AVG_RPM,
        AVG_SPEED,
        ME_RHRS,
    ];
    cols.extend(FUEL_CONS);
    cols.extend(EXHAUST_TEMP);
    cols.extend(AE_RHRS);
    cols.extend(SUB_CONSUMERS);
    cols.push(CYL_OIL_CONS);
    cols
}

// Derived columns appended by the engine.
pub const REPORT_HOURS: &str = "Report Hours";
pub const SFOC: &str = "SFOC";
pub const SCOC: &str = "SCOC";
pub const REASON: &str = "Reason";

/// Fixed context columns for the failure projection, in export order.
/// The assembler keeps only the ones present in the processed table and
/// forces `Ship Name` to the first position afterwards.
pub const CONTEXT: [&str; 17] = [
    SHIP_NAME,
    IMO_NO,
    REPORT_TYPE,
    START_DATE,
    START_TIME,
    END_DATE,
    END_TIME,
    VOYAGE_NUMBER,
    TIME_ZONE,
    DISTANCE_GROUND,
    TIME_SHIFT,
    DISTANCE_SEA,
    AVG_LOAD_KW,
    AVG_RPM,
    AVG_LOAD_PCT,
    ME_RHRS,
    REPORT_HOURS,
];
