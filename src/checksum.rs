/// CRC-16/Modbus over `data`. Init 0xFFFF, polynomial 0xA001; an empty
/// input yields 0xFFFF.
pub fn crc16(data: &[u8]) -> u16 {
    crc16::State::<crc16::MODBUS>::calculate(data)
}

/// AA55 frame checksum: sum of all bytes modulo 0x10000.
pub fn aa55_checksum(data: &[u8]) -> u16 {
    data.iter().fold(0u16, |sum, b| sum.wrapping_add(u16::from(*b)))
}
