use uuid::Uuid;

pub const RECEIPT_PREFIX: &str = "RCPT-";

/// 生成收据号：RCPT- 加 12 位大写十六进制
pub fn generate_receipt_no() -> String {
    let hex = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{RECEIPT_PREFIX}{}", &hex[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_format() {
        let receipt = generate_receipt_no();
        assert!(receipt.starts_with(RECEIPT_PREFIX));
        let suffix = &receipt[RECEIPT_PREFIX.len()..];
        assert_eq!(suffix.len(), 12);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn test_receipts_differ() {
        assert_ne!(generate_receipt_no(), generate_receipt_no());
    }
}
