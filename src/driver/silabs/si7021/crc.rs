/// CRC-8 with polynomial `0x31` (x^8 + x^5 + x^4 + 1), processed MSB first.
///
/// `seed` lets callers chain the checksum over several fields, as the electronic ID does.
pub fn crc8(seed: u8, data: &[u8]) -> u8 {
    let mut crc = seed;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            if crc & 0x80 != 0 {
                crc = (crc << 1) ^ 0x31;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
