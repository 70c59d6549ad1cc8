//! Hybrid-family (ET-style) runtime map: one Modbus read of 125 registers
//! starting at 35100 covers PV strings, the three grid/backup/load rails,
//! battery telemetry and the energy counters.

use super::{FamilyConfig, FamilyProtocol};
use crate::sensor::SensorDefinition as S;
use crate::sensor::SensorKind::*;
use crate::sensor::SensorType::*;

pub(super) fn config() -> FamilyConfig {
    FamilyConfig {
        protocol: FamilyProtocol::Modbus,
        register_start: Some(35100),
        register_count: Some(125),
        sensors: vec![
            S::new("timestamp", 35100, Timestamp, None, "", "Timestamp"),
            S::new("vpv1", 35103, Voltage, Some(Pv), "V", "PV1 Voltage"),
            S::new("ipv1", 35104, Current, Some(Pv), "A", "PV1 Current"),
            S::new("ppv1", 35105, Power4, Some(Pv), "W", "PV1 Power"),
            S::new("vpv2", 35107, Voltage, Some(Pv), "V", "PV2 Voltage"),
            S::new("ipv2", 35108, Current, Some(Pv), "A", "PV2 Current"),
            S::new("ppv2", 35109, Power4, Some(Pv), "W", "PV2 Power"),
            S::new("vpv3", 35111, Voltage, Some(Pv), "V", "PV3 Voltage"),
            S::new("ipv3", 35112, Current, Some(Pv), "A", "PV3 Current"),
            S::new("ppv3", 35113, Power4, Some(Pv), "W", "PV3 Power"),
            S::new("vpv4", 35115, Voltage, Some(Pv), "V", "PV4 Voltage"),
            S::new("ipv4", 35116, Current, Some(Pv), "A", "PV4 Current"),
            S::new("ppv4", 35117, Power4, Some(Pv), "W", "PV4 Power"),
            S::derived("ppv", Power4, Some(Pv), "W", "PV Power"),
            S::new("pv_mode", 35119, Integer, Some(Pv), "", "PV Mode"),
            S::new("vgrid", 35121, Voltage, Some(Ac), "V", "On-grid L1 Voltage"),
            S::new("igrid", 35122, Current, Some(Ac), "A", "On-grid L1 Current"),
            S::new("fgrid", 35123, Frequency, Some(Ac), "Hz", "On-grid L1 Frequency"),
            S::new("pgrid", 35125, PowerS, Some(Ac), "W", "On-grid L1 Power"),
            S::new("vgrid2", 35126, Voltage, Some(Ac), "V", "On-grid L2 Voltage"),
            S::new("igrid2", 35127, Current, Some(Ac), "A", "On-grid L2 Current"),
            S::new("fgrid2", 35128, Frequency, Some(Ac), "Hz", "On-grid L2 Frequency"),
            S::new("pgrid2", 35130, PowerS, Some(Ac), "W", "On-grid L2 Power"),
            S::new("vgrid3", 35131, Voltage, Some(Ac), "V", "On-grid L3 Voltage"),
            S::new("igrid3", 35132, Current, Some(Ac), "A", "On-grid L3 Current"),
            S::new("fgrid3", 35133, Frequency, Some(Ac), "Hz", "On-grid L3 Frequency"),
            S::new("pgrid3", 35135, PowerS, Some(Ac), "W", "On-grid L3 Power"),
            S::new("grid_mode", 35136, Integer, Some(Grid), "", "Grid Mode"),
            S::new("total_inverter_power", 35138, Power4S, Some(Ac), "W", "Total Power"),
            S::new("active_power", 35140, Power4S, Some(Grid), "W", "Active Power"),
            S::new("reactive_power", 35142, Reactive4, Some(Grid), "var", "Reactive Power"),
            S::new("apparent_power", 35144, Apparent4, Some(Grid), "VA", "Apparent Power"),
            S::new("backup_v1", 35145, Voltage, Some(Ups), "V", "Back-up L1 Voltage"),
            S::new("backup_i1", 35146, Current, Some(Ups), "A", "Back-up L1 Current"),
            S::new("backup_f1", 35147, Frequency, Some(Ups), "Hz", "Back-up L1 Frequency"),
            S::new("load_mode1", 35148, Integer, Some(Ac), "", "Load Mode L1"),
            S::new("backup_p1", 35150, Power4S, Some(Ups), "W", "Back-up L1 Power"),
            S::new("backup_v2", 35151, Voltage, Some(Ups), "V", "Back-up L2 Voltage"),
            S::new("backup_i2", 35152, Current, Some(Ups), "A", "Back-up L2 Current"),
            S::new("backup_f2", 35153, Frequency, Some(Ups), "Hz", "Back-up L2 Frequency"),
            S::new("load_mode2", 35154, Integer, Some(Ac), "", "Load Mode L2"),
            S::new("backup_p2", 35156, Power4S, Some(Ups), "W", "Back-up L2 Power"),
            S::new("backup_v3", 35157, Voltage, Some(Ups), "V", "Back-up L3 Voltage"),
            S::new("backup_i3", 35158, Current, Some(Ups), "A", "Back-up L3 Current"),
            S::new("backup_f3", 35159, Frequency, Some(Ups), "Hz", "Back-up L3 Frequency"),
            S::new("load_mode3", 35160, Integer, Some(Ac), "", "Load Mode L3"),
            S::new("backup_p3", 35162, Power4S, Some(Ups), "W", "Back-up L3 Power"),
            S::new("load_p1", 35164, Power4S, Some(Ac), "W", "Load L1"),
            S::new("load_p2", 35166, Power4S, Some(Ac), "W", "Load L2"),
            S::new("load_p3", 35168, Power4S, Some(Ac), "W", "Load L3"),
            S::new("backup_ptotal", 35170, Power4S, Some(Ups), "W", "Back-up Load"),
            S::new("load_ptotal", 35172, Power4S, Some(Ac), "W", "Load"),
            S::new("ups_load", 35173, Integer, Some(Ups), "%", "UPS Load"),
            S::new("temperature_air", 35174, Temp, Some(Ac), "C", "Inverter Temperature (Air)"),
            S::new("temperature_module", 35175, Temp, None, "C", "Inverter Temperature (Module)"),
            S::new("temperature", 35176, Temp, Some(Ac), "C", "Inverter Temperature (Radiator)"),
            S::new("function_bit", 35177, Integer, None, "", "Function Bit"),
            S::new("bus_voltage", 35178, Voltage, None, "V", "Bus Voltage"),
            S::new("nbus_voltage", 35179, Voltage, None, "V", "NBus Voltage"),
            S::new("vbattery1", 35180, Voltage, Some(Bat), "V", "Battery Voltage"),
            S::new("ibattery1", 35181, CurrentS, Some(Bat), "A", "Battery Current"),
            S::new("pbattery1", 35183, PowerS, Some(Bat), "W", "Battery Power"),
            S::new("battery_mode", 35184, Integer, Some(Bat), "", "Battery Mode"),
            S::new("warning_code", 35185, Integer, None, "", "Warning Code"),
            S::new("safety_country", 35186, Integer, Some(Ac), "", "Safety Country"),
            S::new("work_mode", 35187, Integer, Some(Ac), "", "Work Mode"),
            S::new("operation_mode", 35188, Integer, None, "", "Operation Mode"),
            S::new("error_codes", 35189, Long, None, "", "Error Codes"),
            S::new("e_total", 35191, Energy4, Some(Ac), "kWh", "Total PV Generation"),
            S::new("e_day", 35193, Energy4, Some(Ac), "kWh", "Today's PV Generation"),
            S::new("e_total_exp", 35195, Energy4, Some(Grid), "kWh", "Total Energy (export)"),
            S::new("h_total", 35197, Long, Some(Ac), "h", "Hours Total"),
            S::new("e_day_exp", 35199, Energy, Some(Grid), "kWh", "Today Energy (export)"),
            S::new("e_total_imp", 35200, Energy4, Some(Grid), "kWh", "Total Energy (import)"),
            S::new("e_day_imp", 35202, Energy, Some(Grid), "kWh", "Today Energy (import)"),
            S::new("e_load_total", 35203, Energy4, Some(Ac), "kWh", "Total Load"),
            S::new("e_load_day", 35205, Energy, Some(Ac), "kWh", "Today Load"),
            S::new("e_bat_charge_total", 35206, Energy4, Some(Bat), "kWh", "Total Battery Charge"),
            S::new("e_bat_charge_day", 35208, Energy, Some(Bat), "kWh", "Today Battery Charge"),
            S::new("e_bat_discharge_total", 35209, Energy4, Some(Bat), "kWh", "Total Battery Discharge"),
            S::new("e_bat_discharge_day", 35211, Energy, Some(Bat), "kWh", "Today Battery Discharge"),
            S::new("diagnose_result", 35220, Long, None, "", "Diag Status"),
        ],
    }
}
