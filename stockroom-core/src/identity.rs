use chrono::{DateTime, Utc};
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `TXN-<unix millis>-<5 base36 chars>`. Unique enough for correlation,
/// not a key: the Transactions table does not store it.
pub fn transaction_id(at: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..5)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("TXN-{}-{}", at.timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_transaction_id_format() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let id = transaction_id(at);

        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "TXN");
        assert_eq!(parts[1], "1700000000123");
        assert_eq!(parts[2].len(), 5);
        assert!(parts[2].bytes().all(|b| BASE36.contains(&b)));
    }
}
