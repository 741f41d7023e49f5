//! 可复现的字节模式

/// 生成长度为 `len` 的确定性字节序列，不同 `seed` 得到不同序列
pub fn bytes(seed: u8, len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| seed.wrapping_mul(31).wrapping_add(i as u8).wrapping_add(1))
        .collect()
}

/// 以 NUL 结尾、填充到 `slot` 字节的指令槽内容
pub fn instruction_slot(text: &str, slot: usize) -> Vec<u8> {
    let mut out = vec![0u8; slot];
    out[..text.len()].copy_from_slice(text.as_bytes());
    out
}
