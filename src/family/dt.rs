//! Three-phase grid-tie (DT-style) runtime map: 45 registers from 30100.
//! Line-to-line and phase voltages, per-phase currents and frequencies,
//! apparent/reactive power and power factor.

use super::{FamilyConfig, FamilyProtocol};
use crate::sensor::SensorDefinition as S;
use crate::sensor::SensorKind::*;
use crate::sensor::SensorType::*;

pub(super) fn config() -> FamilyConfig {
    FamilyConfig {
        protocol: FamilyProtocol::Modbus,
        register_start: Some(30100),
        register_count: Some(45),
        sensors: vec![
            S::new("timestamp", 30100, Timestamp, None, "", "Timestamp"),
            S::new("vpv1", 30103, Voltage, Some(Pv), "V", "PV1 Voltage"),
            S::new("ipv1", 30104, Current, Some(Pv), "A", "PV1 Current"),
            S::new("vpv2", 30105, Voltage, Some(Pv), "V", "PV2 Voltage"),
            S::new("ipv2", 30106, Current, Some(Pv), "A", "PV2 Current"),
            S::new("vpv3", 30107, Voltage, Some(Pv), "V", "PV3 Voltage"),
            S::new("ipv3", 30108, Current, Some(Pv), "A", "PV3 Current"),
            S::new("vline1", 30109, Voltage, Some(Ac), "V", "On-grid L1-L2 Voltage"),
            S::new("vline2", 30110, Voltage, Some(Ac), "V", "On-grid L2-L3 Voltage"),
            S::new("vline3", 30111, Voltage, Some(Ac), "V", "On-grid L3-L1 Voltage"),
            S::new("vgrid1", 30112, Voltage, Some(Ac), "V", "On-grid L1 Voltage"),
            S::new("vgrid2", 30113, Voltage, Some(Ac), "V", "On-grid L2 Voltage"),
            S::new("vgrid3", 30114, Voltage, Some(Ac), "V", "On-grid L3 Voltage"),
            S::new("igrid1", 30115, Current, Some(Ac), "A", "On-grid L1 Current"),
            S::new("igrid2", 30116, Current, Some(Ac), "A", "On-grid L2 Current"),
            S::new("igrid3", 30117, Current, Some(Ac), "A", "On-grid L3 Current"),
            S::new("fgrid1", 30118, Frequency, Some(Ac), "Hz", "On-grid L1 Frequency"),
            S::new("fgrid2", 30119, Frequency, Some(Ac), "Hz", "On-grid L2 Frequency"),
            S::new("fgrid3", 30120, Frequency, Some(Ac), "Hz", "On-grid L3 Frequency"),
            S::new("total_inverter_power", 30122, Integer, Some(Ac), "W", "Total Power"),
            S::new("work_mode", 30129, Integer, Some(Ac), "", "Work Mode"),
            S::new("error_codes", 30130, Long, None, "", "Error Codes"),
            S::new("warning_code", 30132, Integer, None, "", "Warning Code"),
            S::new("apparent_power", 30133, Apparent4, Some(Ac), "VA", "Apparent Power"),
            S::new("reactive_power", 30135, Reactive4, Some(Ac), "var", "Reactive Power"),
            S::new("power_factor", 30137, Decimal, Some(Ac), "", "Power Factor"),
            S::new("temperature", 30138, Temp, Some(Ac), "C", "Inverter Temperature"),
            S::new("e_day", 30139, Energy, Some(Ac), "kWh", "Today's PV Generation"),
            S::new("e_total", 30140, Energy4, Some(Ac), "kWh", "Total PV Generation"),
            S::new("h_total", 30142, Long, Some(Ac), "h", "Hours Total"),
            S::new("safety_country", 30144, Integer, Some(Ac), "", "Safety Country"),
        ],
    }
}
