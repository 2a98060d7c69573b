//! Notification message content. Delivery is someone else's problem.

use crate::auction::Amount;

/// Fixed template for the leading-bidder notification. Amounts render
/// in their minimal decimal form: `$2001`, never `$2001.00`.
pub fn highest_bidder(current_bid: Amount) -> String {
    format!(
        "You are the highest bidder. Current bid: ${}",
        current_bid.normalize()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn drops_trailing_zeros() {
        assert_eq!(
            highest_bidder(dec!(2001.00)),
            "You are the highest bidder. Current bid: $2001"
        );
    }

    #[test]
    fn keeps_significant_minor_units() {
        assert_eq!(
            highest_bidder(dec!(1999.50)),
            "You are the highest bidder. Current bid: $1999.5"
        );
    }
}
