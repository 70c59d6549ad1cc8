use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

/// Coarse category used by display layers to group sensors. Not used for
/// parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SensorKind {
    Pv,
    Ac,
    Ups,
    Bat,
    Grid,
}

/// Decode rule for one register/byte range. All wire values are big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorType {
    /// u16 / 10, 0xFFFF means absent
    Voltage,
    /// u16 / 10, 0xFFFF means absent
    Current,
    /// i16 / 10, raw 0xFFFF means absent
    CurrentS,
    /// u16 / 100
    Frequency,
    Power,
    PowerS,
    /// u32, 0xFFFFFFFF means absent
    Power4,
    Power4S,
    Integer,
    IntegerS,
    /// u32, 0xFFFFFFFF means absent
    Long,
    LongS,
    /// u16 / 10
    Energy,
    /// u32 / 10
    Energy4,
    /// i16 / 10, -1 and 32767 mean absent
    Temp,
    Byte,
    /// high byte of the u16 word
    ByteH,
    /// low byte of the u16 word
    ByteL,
    /// i16 / scale (scale defaults to 1000)
    Decimal,
    Apparent,
    Apparent4,
    Reactive,
    Reactive4,
    /// 6 bytes: year-2000 month day hour minute second, rendered ISO-8601
    Timestamp,
}

impl SensorType {
    pub fn size(&self) -> usize {
        use SensorType::*;
        match self {
            Byte => 1,
            Power4 | Power4S | Long | LongS | Energy4 | Apparent4 | Reactive4 => 4,
            Timestamp => 6,
            _ => 2,
        }
    }
}

/// One entry of a family's register/byte map.
///
/// `offset` is a register address for Modbus families and a raw byte offset
/// for AA55 families; derived entries that are computed by consumers rather
/// than read off the wire carry `None`.
#[derive(Debug, Clone, Copy)]
pub struct SensorDefinition {
    pub id: &'static str,
    pub offset: Option<u16>,
    pub sensor_type: SensorType,
    pub kind: Option<SensorKind>,
    pub unit: &'static str,
    pub name: &'static str,
    pub scale: i32,
}

impl SensorDefinition {
    pub const fn new(
        id: &'static str,
        offset: u16,
        sensor_type: SensorType,
        kind: Option<SensorKind>,
        unit: &'static str,
        name: &'static str,
    ) -> Self {
        Self {
            id,
            offset: Some(offset),
            sensor_type,
            kind,
            unit,
            name,
            scale: 1000,
        }
    }

    /// Entry with no wire offset; skipped by the decoder.
    pub const fn derived(
        id: &'static str,
        sensor_type: SensorType,
        kind: Option<SensorKind>,
        unit: &'static str,
        name: &'static str,
    ) -> Self {
        Self {
            id,
            offset: None,
            sensor_type,
            kind,
            unit,
            name,
            scale: 1000,
        }
    }

    pub const fn scaled(mut self, scale: i32) -> Self {
        self.scale = scale;
        self
    }
}

/// A decoded sensor value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Float(f64),
    Int(i64),
    Text(String),
}

pub type SensorMap = HashMap<&'static str, Value>;

/// Decodes `payload` against a family's sensor table into a sparse map.
///
/// `base_register` is the first register of the Modbus read block; AA55
/// families pass `None` and their offsets are taken as raw byte offsets.
/// Out-of-bounds offsets and sentinel-encoded values are skipped, never
/// errors; a corrupt field omits one key rather than failing the read.
pub fn parse_sensor_data(
    sensors: &[SensorDefinition],
    base_register: Option<u16>,
    payload: &[u8],
) -> SensorMap {
    let mut values = SensorMap::new();

    for sensor in sensors {
        let register = match sensor.offset {
            Some(r) => r,
            None => continue,
        };

        let offset = match base_register {
            Some(base) => {
                if register < base {
                    continue;
                }
                usize::from(register - base) * 2
            }
            None => usize::from(register),
        };

        if offset + sensor.sensor_type.size() > payload.len() {
            continue;
        }

        if let Some(value) = decode_value(sensor, &payload[offset..]) {
            values.insert(sensor.id, value);
        }
    }

    values
}

fn decode_value(sensor: &SensorDefinition, data: &[u8]) -> Option<Value> {
    use SensorType::*;

    let value = match sensor.sensor_type {
        Voltage | Current => match read_u16(data) {
            0xFFFF => return None,
            v => Value::Float(f64::from(v) / 10.0),
        },
        CurrentS => match read_u16(data) {
            0xFFFF => return None,
            v => Value::Float(f64::from(v as i16) / 10.0),
        },
        Frequency => Value::Float(f64::from(read_u16(data)) / 100.0),
        Power | Integer | Apparent => Value::Int(i64::from(read_u16(data))),
        PowerS | IntegerS | Reactive => Value::Int(i64::from(read_u16(data) as i16)),
        Power4 | Long | Apparent4 => match read_u32(data) {
            0xFFFF_FFFF => return None,
            v => Value::Int(i64::from(v)),
        },
        Power4S | LongS | Reactive4 => Value::Int(i64::from(read_u32(data) as i32)),
        Energy => Value::Float(f64::from(read_u16(data)) / 10.0),
        Energy4 => Value::Float(f64::from(read_u32(data)) / 10.0),
        Temp => match read_u16(data) as i16 {
            -1 | 32767 => return None,
            v => Value::Float(f64::from(v) / 10.0),
        },
        Byte => Value::Int(i64::from(data[0])),
        ByteH => Value::Int(i64::from(read_u16(data) >> 8)),
        ByteL => Value::Int(i64::from(read_u16(data) & 0xFF)),
        Decimal => Value::Float(f64::from(read_u16(data) as i16) / f64::from(sensor.scale)),
        Timestamp => Value::Text(decode_timestamp(data)?),
    };

    Some(value)
}

fn read_u16(data: &[u8]) -> u16 {
    u16::from_be_bytes([data[0], data[1]])
}

fn read_u32(data: &[u8]) -> u32 {
    u32::from_be_bytes([data[0], data[1], data[2], data[3]])
}

fn decode_timestamp(data: &[u8]) -> Option<String> {
    let date = NaiveDate::from_ymd_opt(
        2000 + i32::from(data[0]),
        u32::from(data[1]),
        u32::from(data[2]),
    )?;
    let time = date.and_hms_opt(
        u32::from(data[3]),
        u32::from(data[4]),
        u32::from(data[5]),
    )?;

    Some(time.format("%Y-%m-%dT%H:%M:%S").to_string())
}
