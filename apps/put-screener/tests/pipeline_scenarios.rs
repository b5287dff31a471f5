//! Integration tests for the put screening pipeline.
//!
//! Drives `RetrievePutsUseCase` and `ScreenSymbolUseCase` through the public
//! API against an in-memory options chain.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use put_screener::application::ports::{
    ContractPage, ContractQuery, NoOpPipelineObserver, OptionsDataError, OptionsDataPort,
    PageCursor, PriceLookupError, PriceLookupPort, SnapshotPage,
};
use put_screener::application::services::SnapshotStrategy;
use put_screener::{
    Contract, RetrievePutsConfig, RetrievePutsUseCase, ScreenSymbolRequest, ScreenSymbolUseCase,
    ScreeningError, ScreeningParams, Snapshot,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// =============================================================================
// In-memory chain
// =============================================================================

#[derive(Default)]
struct InMemoryChain {
    pages: Vec<Vec<Contract>>,
    snapshots: HashMap<String, Snapshot>,
    snapshot_calls: AtomicUsize,
}

impl InMemoryChain {
    fn with_contracts(contracts: Vec<Contract>) -> Self {
        Self {
            pages: vec![contracts],
            ..Self::default()
        }
    }

    fn quote(mut self, ticker: &str, bid: Decimal, ask: Decimal) -> Self {
        self.snapshots.insert(
            ticker.to_string(),
            Snapshot {
                ticker: ticker.to_string(),
                bid: Some(bid),
                ask: Some(ask),
                day_close: None,
            },
        );
        self
    }

    fn snapshot_calls(&self) -> usize {
        self.snapshot_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OptionsDataPort for InMemoryChain {
    async fn list_contracts(
        &self,
        _query: &ContractQuery,
        cursor: Option<&PageCursor>,
    ) -> Result<ContractPage, OptionsDataError> {
        let index = cursor.map_or(0, |c| c.as_str().parse::<usize>().unwrap_or(usize::MAX));
        let Some(contracts) = self.pages.get(index) else {
            return Ok(ContractPage::default());
        };
        let next = (index + 1 < self.pages.len()).then(|| PageCursor::new((index + 1).to_string()));
        Ok(ContractPage {
            contracts: contracts.clone(),
            next,
        })
    }

    async fn get_snapshot(
        &self,
        _underlying: &str,
        ticker: &str,
    ) -> Result<Snapshot, OptionsDataError> {
        self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
        self.snapshots
            .get(ticker)
            .cloned()
            .ok_or_else(|| OptionsDataError::NotFound {
                resource: ticker.to_string(),
            })
    }

    async fn list_chain_snapshots(
        &self,
        _underlying: &str,
        _cursor: Option<&PageCursor>,
    ) -> Result<SnapshotPage, OptionsDataError> {
        Ok(SnapshotPage {
            snapshots: self.snapshots.values().cloned().collect(),
            next: None,
        })
    }
}

struct FixedPrice(Decimal);

#[async_trait]
impl PriceLookupPort for FixedPrice {
    async fn current_price(&self, _symbol: &str) -> Result<Decimal, PriceLookupError> {
        Ok(self.0)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
}

fn in_window() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 11, 13).unwrap()
}

fn put(ticker: &str, strike: Decimal, expiry: NaiveDate) -> Contract {
    Contract::put(ticker, "AAPL", strike, expiry)
}

fn params() -> ScreeningParams {
    ScreeningParams::new("AAPL", dec!(8), dec!(150), 30, dec!(1.0), dec!(0.5))
        .unwrap()
        .with_as_of(as_of())
}

fn pipeline(chain: Arc<InMemoryChain>) -> RetrievePutsUseCase<InMemoryChain, NoOpPipelineObserver> {
    RetrievePutsUseCase::new(
        chain,
        Arc::new(NoOpPipelineObserver),
        RetrievePutsConfig::default(),
    )
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn tight_quote_inside_band_is_included() {
    let chain = Arc::new(
        InMemoryChain::with_contracts(vec![put("O:AAPL261113P00140000", dec!(140), in_window())])
            .quote("O:AAPL261113P00140000", dec!(2.0), dec!(2.2)),
    );

    let results = pipeline(Arc::clone(&chain)).retrieve_puts(&params()).await;

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.ticker, "O:AAPL261113P00140000");
    assert_eq!(result.premium, dec!(2.1));
    assert_eq!(result.spread, Some(dec!(0.2)));
    assert_eq!(result.bid, Some(dec!(2.0)));
    assert_eq!(result.ask, Some(dec!(2.2)));
}

#[tokio::test]
async fn wide_spread_is_excluded() {
    let chain = Arc::new(
        InMemoryChain::with_contracts(vec![put("O:AAPL261113P00140000", dec!(140), in_window())])
            .quote("O:AAPL261113P00140000", dec!(2.0), dec!(3.5)),
    );

    let results = pipeline(chain).retrieve_puts(&params()).await;

    assert!(results.is_empty());
}

#[tokio::test]
async fn contract_without_snapshot_is_dropped() {
    let chain = Arc::new(
        InMemoryChain::with_contracts(vec![
            put("O:AAPL261113P00140000", dec!(140), in_window()),
            put("O:AAPL261113P00145000", dec!(145), in_window()),
        ])
        .quote("O:AAPL261113P00140000", dec!(2.0), dec!(2.2)),
    );

    let results = pipeline(Arc::clone(&chain)).retrieve_puts(&params()).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].ticker, "O:AAPL261113P00140000");
    assert_eq!(chain.snapshot_calls(), 2);
}

#[tokio::test]
async fn empty_listing_issues_no_snapshot_calls() {
    let chain = Arc::new(InMemoryChain::default());

    let results = pipeline(Arc::clone(&chain)).retrieve_puts(&params()).await;

    assert!(results.is_empty());
    assert_eq!(chain.snapshot_calls(), 0);
}

#[tokio::test]
async fn contracts_across_pages_are_all_screened() {
    let chain = InMemoryChain {
        pages: vec![
            vec![put("O:AAPL261113P00140000", dec!(140), in_window())],
            vec![put("O:AAPL261120P00145000", dec!(145), in_window() + Days::new(7))],
        ],
        ..InMemoryChain::default()
    }
    .quote("O:AAPL261113P00140000", dec!(2.0), dec!(2.2))
    .quote("O:AAPL261120P00145000", dec!(3.0), dec!(3.2));

    let results = pipeline(Arc::new(chain)).retrieve_puts(&params()).await;

    let tickers: Vec<&str> = results.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(
        tickers,
        vec!["O:AAPL261113P00140000", "O:AAPL261120P00145000"]
    );
}

#[tokio::test]
async fn batch_strategy_matches_per_ticker_results() {
    let contracts = vec![
        put("O:AAPL261113P00140000", dec!(140), in_window()),
        put("O:AAPL261113P00145000", dec!(145), in_window()),
        put("O:AAPL261113P00130000", dec!(130), in_window()),
    ];
    let chain = Arc::new(
        InMemoryChain::with_contracts(contracts)
            .quote("O:AAPL261113P00140000", dec!(2.0), dec!(2.2))
            .quote("O:AAPL261113P00145000", dec!(3.0), dec!(3.1))
            .quote("O:AAPL261113P00130000", dec!(1.5), dec!(1.6)),
    );

    let per_ticker = pipeline(Arc::clone(&chain)).retrieve_puts(&params()).await;
    let batch = RetrievePutsUseCase::new(
        Arc::clone(&chain),
        Arc::new(NoOpPipelineObserver),
        RetrievePutsConfig {
            strategy: SnapshotStrategy::Batch,
            ..RetrievePutsConfig::default()
        },
    )
    .retrieve_puts(&params())
    .await;

    assert_eq!(per_ticker, batch);
    // Strike 130 is below the 138 lower bound
    assert_eq!(per_ticker.len(), 2);
    assert_eq!(per_ticker[0].strike_price, dec!(145));
}

#[tokio::test]
async fn repeated_runs_are_identical() {
    let chain = Arc::new(
        InMemoryChain::with_contracts(vec![
            put("O:AAPL261113P00140000", dec!(140), in_window()),
            put("O:AAPL261113P00145000", dec!(145), in_window()),
        ])
        .quote("O:AAPL261113P00140000", dec!(2.0), dec!(2.2))
        .quote("O:AAPL261113P00145000", dec!(3.0), dec!(3.1)),
    );
    let use_case = pipeline(chain);

    let first = use_case.retrieve_puts(&params()).await;
    let second = use_case.retrieve_puts(&params()).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn screen_symbol_resolves_price_then_screens() {
    let chain = Arc::new(
        InMemoryChain::with_contracts(vec![put("O:AAPL261113P00140000", dec!(140), in_window())])
            .quote("O:AAPL261113P00140000", dec!(2.0), dec!(2.2)),
    );
    let use_case = ScreenSymbolUseCase::new(Arc::new(FixedPrice(dec!(150))), pipeline(chain));

    let result = use_case
        .execute(ScreenSymbolRequest {
            symbol: " aapl ".to_string(),
            upper_bound_strike_pct: dec!(8),
            expiry_days: 30,
            min_commission: dec!(1.0),
            max_spread: dec!(0.5),
            as_of: Some(as_of()),
        })
        .await
        .unwrap();

    assert_eq!(result.symbol, "AAPL");
    assert_eq!(result.current_price, dec!(150));
    assert_eq!(result.options.len(), 1);
}

#[tokio::test]
async fn screen_symbol_rejects_negative_expiry() {
    let chain = Arc::new(InMemoryChain::default());
    let use_case = ScreenSymbolUseCase::new(Arc::new(FixedPrice(dec!(150))), pipeline(chain));

    let err = use_case
        .execute(ScreenSymbolRequest {
            symbol: "AAPL".to_string(),
            upper_bound_strike_pct: dec!(8),
            expiry_days: -1,
            min_commission: dec!(1.0),
            max_spread: dec!(0.5),
            as_of: Some(as_of()),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ScreeningError::InvalidParameter { name: "expiry", .. }));
}

// =============================================================================
// Property: every result satisfies the screening rules
// =============================================================================

fn arb_contract() -> impl Strategy<Value = (u32, u32, u64, u32, u32)> {
    // (id, strike in cents, expiry offset days, bid in cents, ask spread in cents)
    (0u32..10_000, 10_000u32..20_000, 0u64..60, 0u32..1_000, 0u32..200)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn results_respect_band_window_and_thresholds(
        rows in prop::collection::vec(arb_contract(), 0..40),
    ) {
        let mut chain = InMemoryChain::default();
        let mut contracts = Vec::new();
        for (id, strike_cents, offset, bid_cents, spread_cents) in &rows {
            let ticker = format!("O:AAPL{id:05}P");
            let expiry = as_of() + Days::new(*offset);
            contracts.push(put(&ticker, Decimal::new(i64::from(*strike_cents), 2), expiry));
            let bid = Decimal::new(i64::from(*bid_cents), 2);
            let ask = bid + Decimal::new(i64::from(*spread_cents), 2);
            chain = chain.quote(&ticker, bid, ask);
        }
        chain.pages = vec![contracts];

        let params = params();
        let results = tokio_test::block_on(pipeline(Arc::new(chain)).retrieve_puts(&params));

        let min_expiry = NaiveDate::from_ymd_opt(2026, 10, 29).unwrap();
        let max_expiry = NaiveDate::from_ymd_opt(2026, 11, 28).unwrap();
        for result in &results {
            prop_assert!(result.strike_price >= dec!(138));
            prop_assert!(result.strike_price < dec!(150));
            prop_assert!(result.expiration_date >= min_expiry);
            prop_assert!(result.expiration_date <= max_expiry);
            prop_assert!(result.premium >= dec!(1.0));
            prop_assert!(result.spread.is_none_or(|s| s <= dec!(0.5)));
        }
        for pair in results.windows(2) {
            let ordered = pair[0].expiration_date < pair[1].expiration_date
                || (pair[0].expiration_date == pair[1].expiration_date
                    && pair[0].strike_price >= pair[1].strike_price);
            prop_assert!(ordered);
        }
    }
}
