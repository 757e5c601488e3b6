//! 金额计算工具。
//!
//! 所有金额在存储与接口上都是 i64 美分（整数最小单位），
//! 佣金比例是 basis points（10000 = 100%），全程不经过二进制浮点。

/// basis points 分母，10000 bps = 100%
pub const BPS_DENOMINATOR: i64 = 10_000;

/// 按比例计算佣金金额（美分），四舍五入采用 round-half-up。
///
/// 入参要求非负，调用方先做校验。
pub fn commission_amount_cents(product_price: i64, commission_rate_bps: i64) -> i64 {
    debug_assert!(product_price >= 0);
    debug_assert!((0..=BPS_DENOMINATOR).contains(&commission_rate_bps));

    (product_price * commission_rate_bps + BPS_DENOMINATOR / 2) / BPS_DENOMINATOR
}

/// 美分格式化为十进制字符串，如 2000 -> "20.00"，仅用于日志与通知
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commission_rounds_half_up() {
        // $199.99 * 10% = $19.999 -> $20.00
        assert_eq!(commission_amount_cents(19_999, 1_000), 2_000);
        // $0.05 * 5% = $0.0025 -> $0.00
        assert_eq!(commission_amount_cents(5, 500), 0);
        // $1.00 * 0.05% = $0.0005 -> 正好一半，进位
        assert_eq!(commission_amount_cents(100, 5), 1);
    }

    #[test]
    fn test_commission_exact_cases() {
        assert_eq!(commission_amount_cents(10_000, 500), 500); // $100 * 5% = $5
        assert_eq!(commission_amount_cents(10_000, 0), 0);
        assert_eq!(commission_amount_cents(10_000, 10_000), 10_000); // 100%
        assert_eq!(commission_amount_cents(0, 1_000), 0);
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(2_000), "20.00");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-1_234), "-12.34");
        assert_eq!(format_cents(1_000_000), "10000.00");
    }
}
