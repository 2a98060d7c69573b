//! Proxy-bid resolution.
//!
//! Pure ascending-auction arithmetic: each bidder registers a hidden
//! maximum, and the visible bid only rises as far as needed to beat the
//! previous standing bidder. No I/O happens here; the coordinator feeds
//! in a snapshot and commits whatever comes back.

use crate::auction::{Amount, AuctionItem, BidError, SubmitBidRequest};

/// What a successful resolution changes on the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// The new publicly visible bid.
    pub new_current_bid: Amount,
    /// Sticky: once true, stays true on every later resolution.
    pub reserve_price_met: bool,
}

/// Resolve an incoming bid against the item snapshot and the standing
/// leader's ceiling.
///
/// Checks run in a fixed order; the first failing one wins:
///
/// 1. closed auctions accept nothing;
/// 2. the requester's ceiling must exceed the visible current bid;
/// 3. a standing ceiling at or above the requester's ceiling keeps the
///    old leader in place;
/// 4. otherwise the requester leads, paying the smaller of their own
///    ceiling and one increment over the previous leader's ceiling
///    (their full ceiling when there is no previous leader);
/// 5. a would-be leading bid that still falls short of an unmet reserve
///    is rejected outright and nothing is recorded.
pub fn resolve(
    item: &AuctionItem,
    leader_ceiling: Option<Amount>,
    request: &SubmitBidRequest,
    increment: Amount,
) -> Result<Resolution, BidError> {
    if item.closed {
        return Err(BidError::AuctionClosed);
    }

    if request.max_auto_bid <= item.current_bid {
        return Err(BidError::InvalidBidAmount {
            current_bid: item.current_bid,
        });
    }

    if let Some(ceiling) = leader_ceiling {
        if ceiling >= request.max_auto_bid {
            return Err(BidError::Outbid);
        }
    }

    let new_current_bid = match leader_ceiling {
        Some(ceiling) => request.max_auto_bid.min(ceiling + increment),
        None => request.max_auto_bid,
    };

    if !item.reserve_price_met && new_current_bid < item.reserve_price {
        return Err(BidError::ReserveNotMet {
            reserve_price: item.reserve_price,
        });
    }

    Ok(Resolution {
        new_current_bid,
        reserve_price_met: item.reserve_price_met || new_current_bid >= item.reserve_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::Amount;
    use rust_decimal_macros::dec;

    fn item(current_bid: Amount, reserve_price: Amount) -> AuctionItem {
        AuctionItem {
            id: "lot-1".to_owned(),
            current_bid,
            reserve_price,
            reserve_price_met: false,
            closed: false,
        }
    }

    fn request(max_auto_bid: Amount) -> SubmitBidRequest {
        SubmitBidRequest {
            item: "lot-1".to_owned(),
            bidder: "alice".to_owned(),
            max_auto_bid,
        }
    }

    fn inc() -> Amount {
        Amount::ONE
    }

    #[test]
    fn closed_auction_accepts_nothing() {
        let mut item = item(dec!(100), dec!(1000));
        item.closed = true;

        assert_eq!(
            resolve(&item, None, &request(dec!(1_000_000)), inc()),
            Err(BidError::AuctionClosed)
        );
        // closed wins even over a bid that would fail every other check
        assert_eq!(
            resolve(&item, Some(dec!(500)), &request(dec!(50)), inc()),
            Err(BidError::AuctionClosed)
        );
    }

    #[test]
    fn ceiling_must_exceed_current_bid() {
        let item = item(dec!(80000), dec!(1000));

        assert_eq!(
            resolve(&item, None, &request(dec!(2000)), inc()),
            Err(BidError::InvalidBidAmount {
                current_bid: dec!(80000)
            })
        );
        // matching the visible bid is not enough
        assert_eq!(
            resolve(&item, None, &request(dec!(80000)), inc()),
            Err(BidError::InvalidBidAmount {
                current_bid: dec!(80000)
            })
        );
    }

    #[test]
    fn current_bid_check_runs_before_outbid_check() {
        let item = item(dec!(5000), dec!(1000));

        assert_eq!(
            resolve(&item, Some(dec!(80000)), &request(dec!(4000)), inc()),
            Err(BidError::InvalidBidAmount {
                current_bid: dec!(5000)
            })
        );
    }

    #[test]
    fn dominated_by_standing_ceiling() {
        let mut item = item(dec!(1501), dec!(1000));
        item.reserve_price_met = true;

        assert_eq!(
            resolve(&item, Some(dec!(80000)), &request(dec!(2000)), inc()),
            Err(BidError::Outbid)
        );
        // an exactly matching ceiling also keeps the old leader
        assert_eq!(
            resolve(&item, Some(dec!(2000)), &request(dec!(2000)), inc()),
            Err(BidError::Outbid)
        );
    }

    #[test]
    fn opening_bid_uses_the_full_ceiling() {
        let item = item(Amount::ZERO, dec!(1000));

        assert_eq!(
            resolve(&item, None, &request(dec!(1500)), inc()),
            Ok(Resolution {
                new_current_bid: dec!(1500),
                reserve_price_met: true,
            })
        );
    }

    #[test]
    fn new_leader_pays_one_increment_over_the_old_ceiling() {
        let mut item = item(dec!(1500), dec!(1000));
        item.reserve_price_met = true;

        assert_eq!(
            resolve(&item, Some(dec!(2000)), &request(dec!(2500)), inc()),
            Ok(Resolution {
                new_current_bid: dec!(2001),
                reserve_price_met: true,
            })
        );
    }

    #[test]
    fn new_visible_bid_is_capped_by_the_requesters_own_ceiling() {
        let mut item = item(dec!(1500), dec!(1000));
        item.reserve_price_met = true;

        assert_eq!(
            resolve(&item, Some(dec!(2000)), &request(dec!(2000.50)), inc()),
            Ok(Resolution {
                new_current_bid: dec!(2000.50),
                reserve_price_met: true,
            })
        );
    }

    #[test]
    fn reserve_blocks_any_would_be_leader() {
        let item = item(Amount::ZERO, dec!(1000));

        assert_eq!(
            resolve(&item, None, &request(dec!(500)), inc()),
            Err(BidError::ReserveNotMet {
                reserve_price: dec!(1000)
            })
        );
        // same rule with a standing leader below reserve
        let below = AuctionItem {
            current_bid: dec!(600),
            ..item
        };
        assert_eq!(
            resolve(&below, Some(dec!(600)), &request(dec!(800)), inc()),
            Err(BidError::ReserveNotMet {
                reserve_price: dec!(1000)
            })
        );
    }

    #[test]
    fn met_reserve_flag_is_sticky() {
        let mut item = item(dec!(1200), dec!(5000));
        item.reserve_price_met = true;

        // the new visible bid is below reserve, but the flag never reverts
        assert_eq!(
            resolve(&item, Some(dec!(1250)), &request(dec!(1300)), inc()),
            Ok(Resolution {
                new_current_bid: dec!(1251),
                reserve_price_met: true,
            })
        );
    }
}
