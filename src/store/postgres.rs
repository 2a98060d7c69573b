//! Postgres-backed stores.
//!
//! Bids and item updates land in the same database transaction, which
//! is what makes a committed submission atomic.

use super::*;
use crate::persistence::postgres::{PostgresPersistence, PostgresTransaction};
use rust_decimal::Decimal;

/// One-time schema setup.
pub fn create_schema(client: &mut ::postgres::Client) -> Result<()> {
    client.batch_execute(
        "CREATE TABLE IF NOT EXISTS auction_items (
            id TEXT PRIMARY KEY,
            current_bid NUMERIC NOT NULL,
            reserve_price NUMERIC NOT NULL,
            reserve_price_met BOOLEAN NOT NULL,
            closed BOOLEAN NOT NULL
        );
        CREATE TABLE IF NOT EXISTS bids (
            item_id TEXT NOT NULL REFERENCES auction_items (id),
            bidder TEXT NOT NULL,
            max_auto_bid NUMERIC NOT NULL,
            visible_amount NUMERIC NOT NULL,
            seq BIGINT NOT NULL,
            PRIMARY KEY (item_id, seq)
        );",
    )?;
    Ok(())
}

pub struct PostgresItemStore;

impl PostgresItemStore {
    pub fn new_shared() -> SharedItemStore<PostgresPersistence> {
        Arc::new(Self)
    }
}

impl ItemStore for PostgresItemStore {
    type Persistence = PostgresPersistence;

    fn load<'a>(
        &self,
        tr: &mut PostgresTransaction<'a>,
        item_id: ItemIdRef,
    ) -> Result<Option<AuctionItem>> {
        Ok(tr
            .query_opt(
                "SELECT current_bid, reserve_price, reserve_price_met, closed \
                 FROM auction_items WHERE id = $1",
                &[&item_id],
            )?
            .map(|row| AuctionItem {
                id: item_id.to_owned(),
                current_bid: row.get("current_bid"),
                reserve_price: row.get("reserve_price"),
                reserve_price_met: row.get("reserve_price_met"),
                closed: row.get("closed"),
            }))
    }

    fn save<'a>(&self, tr: &mut PostgresTransaction<'a>, item: &AuctionItem) -> Result<()> {
        // reserve_price is immutable after listing, so it is left alone
        // on conflict
        tr.execute(
            "INSERT INTO auction_items \
                 (id, current_bid, reserve_price, reserve_price_met, closed) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE SET \
                 current_bid = excluded.current_bid, \
                 reserve_price_met = excluded.reserve_price_met, \
                 closed = excluded.closed",
            &[
                &item.id,
                &item.current_bid,
                &item.reserve_price,
                &item.reserve_price_met,
                &item.closed,
            ],
        )?;
        Ok(())
    }
}

pub struct PostgresBidStore;

impl PostgresBidStore {
    pub fn new_shared() -> SharedBidStore<PostgresPersistence> {
        Arc::new(Self)
    }
}

impl BidStore for PostgresBidStore {
    type Persistence = PostgresPersistence;

    fn save<'a>(&self, tr: &mut PostgresTransaction<'a>, draft: BidDraft) -> Result<Bid> {
        let row = tr.query_one(
            "INSERT INTO bids (item_id, bidder, max_auto_bid, visible_amount, seq) \
             VALUES ($1, $2, $3, $4, \
                 coalesce((SELECT max(seq) FROM bids WHERE item_id = $1), 0) + 1) \
             RETURNING seq",
            &[
                &draft.item,
                &draft.bidder,
                &draft.max_auto_bid,
                &draft.visible_amount,
            ],
        )?;
        let seq = u64::try_from(row.get::<_, i64>(0))?;
        Ok(Bid {
            item: draft.item,
            bidder: draft.bidder,
            max_auto_bid: draft.max_auto_bid,
            visible_amount: draft.visible_amount,
            seq,
        })
    }

    fn find_leader_ceiling<'a>(
        &self,
        tr: &mut PostgresTransaction<'a>,
        item_id: ItemIdRef,
    ) -> Result<Option<Amount>> {
        let row = tr.query_one(
            "SELECT max(max_auto_bid) FROM bids WHERE item_id = $1",
            &[&item_id],
        )?;
        Ok(row.get::<_, Option<Decimal>>(0))
    }
}
