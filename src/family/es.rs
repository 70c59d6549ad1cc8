//! Legacy storage (ES-style) runtime map. These inverters answer the AA55
//! `010600` command with a packed payload addressed by raw byte offset, not
//! Modbus registers.

use super::{FamilyConfig, FamilyProtocol};
use crate::sensor::SensorDefinition as S;
use crate::sensor::SensorKind::*;
use crate::sensor::SensorType::*;

pub(super) fn config() -> FamilyConfig {
    FamilyConfig {
        protocol: FamilyProtocol::Aa55,
        register_start: None,
        register_count: None,
        sensors: vec![
            S::new("vpv1", 0, Voltage, Some(Pv), "V", "PV1 Voltage"),
            S::new("ipv1", 2, Current, Some(Pv), "A", "PV1 Current"),
            S::new("vpv2", 4, Voltage, Some(Pv), "V", "PV2 Voltage"),
            S::new("ipv2", 6, Current, Some(Pv), "A", "PV2 Current"),
            S::new("vbattery1", 8, Voltage, Some(Bat), "V", "Battery Voltage"),
            S::new("battery_temperature", 10, Temp, Some(Bat), "C", "Battery Temperature"),
            S::new("ibattery1", 12, CurrentS, Some(Bat), "A", "Battery Current"),
            S::new("battery_charge_limit", 14, Current, Some(Bat), "A", "Battery Charge Limit"),
            S::new("battery_discharge_limit", 16, Current, Some(Bat), "A", "Battery Discharge Limit"),
            S::new("battery_error", 18, Integer, Some(Bat), "", "Battery Error Code"),
            S::new("battery_bms", 20, ByteH, Some(Bat), "", "Battery BMS Status"),
            S::new("battery_soc", 20, ByteL, Some(Bat), "%", "Battery State of Charge"),
            S::new("battery_soh", 22, ByteL, Some(Bat), "%", "Battery State of Health"),
            S::new("battery_mode", 24, ByteL, Some(Bat), "", "Battery Mode"),
            S::new("battery_warning", 26, Integer, Some(Bat), "", "Battery Warning Code"),
            S::new("meter_status", 28, Byte, Some(Grid), "", "Meter Status"),
            S::new("vgrid", 29, Voltage, Some(Ac), "V", "On-grid Voltage"),
            S::new("igrid", 31, Current, Some(Ac), "A", "On-grid Current"),
            S::new("pgrid", 33, PowerS, Some(Grid), "W", "On-grid Export Power"),
            S::new("fgrid", 35, Frequency, Some(Ac), "Hz", "On-grid Frequency"),
            S::new("meter_power_factor", 37, Decimal, Some(Grid), "", "Meter Power Factor"),
            S::new("inverter_status", 39, ByteL, None, "", "Work Mode"),
            S::new("vload", 41, Voltage, Some(Ups), "V", "Back-up Voltage"),
            S::new("iload", 43, Current, Some(Ups), "A", "Back-up Current"),
            S::new("pload", 45, PowerS, Some(Ac), "W", "Load"),
            S::new("fload", 47, Frequency, Some(Ups), "Hz", "Back-up Frequency"),
            S::new("temperature", 49, Temp, Some(Ac), "C", "Inverter Temperature"),
            S::new("warning_code", 51, Integer, None, "", "Warning Code"),
            S::new("work_mode", 53, ByteL, Some(Ac), "", "Energy Mode"),
            S::new("error_codes", 55, Long, None, "", "Error Codes"),
            S::new("e_total", 59, Energy4, Some(Ac), "kWh", "Total PV Generation"),
            S::new("h_total", 63, Long, Some(Ac), "h", "Hours Total"),
            S::new("e_day", 67, Energy, Some(Ac), "kWh", "Today's PV Generation"),
            S::new("e_load_day", 69, Energy, Some(Ac), "kWh", "Today Load"),
            S::new("e_load_total", 71, Energy4, Some(Ac), "kWh", "Total Load"),
            S::new("total_power", 75, PowerS, Some(Ac), "W", "Total Power"),
            S::new("effective_work_mode", 77, Byte, None, "", "Effective Work Mode"),
            S::new("grid_in_out", 80, ByteL, Some(Grid), "", "On-grid Mode"),
            S::new("pback_up", 82, Power, Some(Ups), "W", "Back-up Power"),
            S::derived("plant_power", PowerS, Some(Ac), "W", "Plant Power"),
            S::new("diagnose_result", 86, Long, None, "", "Diag Status"),
            S::derived("house_consumption", PowerS, Some(Ac), "W", "House Consumption"),
        ],
    }
}
