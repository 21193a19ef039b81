//! Engine sequencing, policy cadence, quote snapshots and volatility refresh

use lobsim_core::analytics::VolatilityContext;
use lobsim_core::config::SimConfig;
use lobsim_core::core::{ReplayError, Side, NANOS_PER_SEC};
use lobsim_core::data::{MarketEvent, VecFeed, F_LAST};
use lobsim_core::engine::{Engine, Passive};
use lobsim_core::execution::{NoFill, ProRataFill};
use lobsim_core::orderbook::OrderManager;
use lobsim_core::testing::{boundary_trade, ladder_event, oscillating_session, top_of_book_event, FnPolicy, CENT};

const TEN: u64 = 10_000_000_000;

#[test]
fn test_identical_book_updates_record_one_quote() {
    let mut engine = Engine::new(NoFill, Passive, VolatilityContext::default());
    engine.orders_mut().place(TEN, 10, Side::Bid);

    for ts in 0..5 {
        engine.process_event(&ladder_event(ts, TEN, 100, 0)).unwrap();
    }

    let quotes = engine.ledger().quotes();
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].ts_event, 0);
    assert_eq!(quotes[0].bot_quotes(), (Some(TEN), None));
    assert_eq!(engine.stats().quote_snapshots, 1);
}

#[test]
fn test_market_moves_alone_do_not_record_quotes() {
    let mut engine = Engine::new(NoFill, Passive, VolatilityContext::default());
    for (ts, best) in [TEN, TEN + CENT, TEN - CENT, TEN + 3 * CENT].into_iter().enumerate() {
        engine.process_event(&ladder_event(ts as u64, best, 100, 0)).unwrap();
    }
    assert_eq!(engine.ledger().quotes().len(), 1);
}

#[test]
fn test_bot_quote_change_records_snapshot() {
    let policy = FnPolicy::new(|view, orders| {
        orders.place(view.best(Side::Bid), 10, Side::Bid);
    });
    let mut engine = Engine::new(NoFill, policy, VolatilityContext::default());

    engine.process_event(&ladder_event(0, TEN, 100, F_LAST)).unwrap();
    engine.process_event(&ladder_event(1, TEN, 100, F_LAST)).unwrap();
    engine.process_event(&ladder_event(2, TEN + CENT, 100, F_LAST)).unwrap();

    let quotes = engine.ledger().quotes();
    // Second event leaves the bot's quotes alone; the third places a
    // higher bid
    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[0].bot_bid, Some(TEN));
    assert_eq!(quotes[1].bot_bid, Some(TEN + CENT));
    assert_eq!(quotes[1].market_bid, TEN + CENT);
}

#[test]
fn test_out_of_order_event_is_rejected() {
    let mut engine = Engine::new(ProRataFill, Passive, VolatilityContext::default());
    engine.process_event(&ladder_event(10, TEN, 100, 0)).unwrap();

    // Equal timestamps are fine
    engine.process_event(&ladder_event(10, TEN, 120, 0)).unwrap();

    let err = engine
        .process_event(&ladder_event(5, TEN + CENT, 100, 0))
        .unwrap_err();
    assert_eq!(
        err,
        ReplayError::SequencingViolation {
            previous: 10,
            received: 5
        }
    );

    // Rejected event left no trace
    assert_eq!(engine.stats().events_processed, 2);
    assert_eq!(engine.current_ts(), 10);
    assert_eq!(engine.book().best_bid_price(), TEN);
    assert_eq!(engine.book().size_at(Side::Bid, 0), 120);
}

#[test]
fn test_run_stops_on_sequencing_violation() {
    let events = vec![
        ladder_event(100, TEN, 100, 0),
        ladder_event(50, TEN, 100, 0),
        ladder_event(200, TEN, 100, 0),
    ];
    let mut engine = Engine::new(ProRataFill, Passive, VolatilityContext::default());
    let err = engine.run(VecFeed::new(events)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ReplayError>(),
        Some(ReplayError::SequencingViolation { .. })
    ));
    assert_eq!(engine.stats().events_processed, 1);
}

#[test]
fn test_policy_runs_only_at_batch_boundaries() {
    let policy = FnPolicy::new(|_, _| {});
    let mut engine = Engine::new(NoFill, policy, VolatilityContext::default());

    let events = [
        ladder_event(0, TEN, 100, 0),
        MarketEvent::trade(1, TEN, 5, 0, 0),
        ladder_event(2, TEN, 100, F_LAST),
        ladder_event(3, TEN, 100, 1),
        MarketEvent::trade(4, TEN, 5, 0, F_LAST | 1),
    ];
    for event in &events {
        engine.process_event(event).unwrap();
    }

    assert_eq!(engine.quoting().calls, 2);
    assert_eq!(engine.stats().policy_invocations, 2);
}

#[test]
fn test_boundary_threshold_is_configurable() {
    let config = SimConfig {
        boundary_flag_threshold: 1,
        ..SimConfig::default()
    };
    let policy = FnPolicy::new(|_, _| {});
    let mut engine =
        Engine::with_config(NoFill, policy, config, VolatilityContext::default()).unwrap();

    engine.process_event(&ladder_event(0, TEN, 100, 0)).unwrap();
    engine.process_event(&ladder_event(1, TEN, 100, 1)).unwrap();
    engine.process_event(&ladder_event(2, TEN, 100, F_LAST)).unwrap();

    assert_eq!(engine.quoting().calls, 2);
}

#[test]
fn test_policy_sees_book_after_trade_without_rebuild() {
    let policy = FnPolicy::new(|view, orders| {
        orders.place(view.best(Side::Bid), view.book.size_at(Side::Bid, 0), Side::Bid);
    });
    let mut engine = Engine::new(ProRataFill, policy, VolatilityContext::default());

    engine.process_event(&top_of_book_event(0, (TEN, 100), (TEN + CENT, 100), 0)).unwrap();
    engine.process_event(&boundary_trade(1, TEN, 60, 0)).unwrap();

    // Decision was made against the pre-trade book
    assert_eq!(engine.orders().size_at(Side::Bid, TEN), 100);
}

#[test]
fn test_place_at_same_price_replaces_size() {
    let mut size = 0;
    let policy = FnPolicy::new(move |view, orders| {
        size += 10;
        orders.place(view.best(Side::Bid), size, Side::Bid);
    });
    let mut engine = Engine::new(NoFill, policy, VolatilityContext::default());

    engine.process_event(&ladder_event(0, TEN, 100, F_LAST)).unwrap();
    engine.process_event(&ladder_event(1, TEN, 100, F_LAST)).unwrap();

    assert_eq!(engine.orders().count(Side::Bid), 1);
    assert_eq!(engine.orders().size_at(Side::Bid, TEN), 20);
}

#[test]
fn test_policy_may_leave_several_orders_per_side() {
    let policy = FnPolicy::new(|view, orders| {
        let best = view.best(Side::Ask);
        orders.place(best, 5, Side::Ask);
        orders.place(best + CENT, 5, Side::Ask);
        orders.place(best + 2 * CENT, 5, Side::Ask);
    });
    let mut engine = Engine::new(NoFill, policy, VolatilityContext::default());
    engine.process_event(&ladder_event(0, TEN, 100, F_LAST)).unwrap();

    assert_eq!(engine.orders().count(Side::Ask), 3);
    assert_eq!(engine.orders().best_ask(), Some(TEN + CENT));
}

#[test]
fn test_volatility_refreshes_on_cadence() {
    // 1000 events, 100ms apart: 100 seconds of book
    let events = oscillating_session(1_000, TEN, 5);
    let volatility = VolatilityContext::build(&events);
    assert!(!volatility.is_empty());

    let mut engine = Engine::new(ProRataFill, Passive, volatility);
    let stats = engine.run(VecFeed::new(events)).unwrap();

    assert_eq!(stats.events_processed, 1_000);
    assert_eq!(stats.vol_refreshes, 10);
    assert_eq!(stats.vol_misses, 0);

    // Last refresh happened at event 900, 90 seconds in
    let cached = engine.cached_volatility().unwrap();
    assert_eq!(cached.second, 90);
}

#[test]
fn test_volatility_miss_keeps_cache_empty() {
    let events = oscillating_session(250, TEN, 5);
    let mut engine = Engine::new(ProRataFill, Passive, VolatilityContext::default());
    let stats = engine.run(VecFeed::new(events)).unwrap();

    // Refresh points at events 0, 100 and 200
    assert_eq!(stats.vol_refreshes, 0);
    assert_eq!(stats.vol_misses, 3);
    assert!(engine.cached_volatility().is_none());
}

#[test]
fn test_volatility_miss_keeps_last_sample() {
    // Table covers seconds 0..=2 only
    let table_rows = [
        ladder_event(0, TEN, 100, 0),
        ladder_event(2 * NANOS_PER_SEC, TEN + CENT, 100, 0),
    ];
    let volatility = VolatilityContext::build(&table_rows);
    assert_eq!(volatility.len(), 3);

    let config = SimConfig {
        vol_refresh_interval: 1,
        ..SimConfig::default()
    };
    let mut engine = Engine::with_config(NoFill, Passive, config, volatility).unwrap();

    engine
        .process_event(&ladder_event(2 * NANOS_PER_SEC, TEN + CENT, 100, 0))
        .unwrap();
    let hit = *engine.cached_volatility().unwrap();
    assert_eq!(hit.second, 2);

    engine
        .process_event(&ladder_event(50 * NANOS_PER_SEC, TEN + 2 * CENT, 100, 0))
        .unwrap();
    assert_eq!(engine.cached_volatility(), Some(&hit));

    let stats = engine.stats();
    assert_eq!(stats.vol_refreshes, 1);
    assert_eq!(stats.vol_misses, 1);
}

#[test]
fn test_policy_sees_cached_volatility() {
    let seen = std::rc::Rc::new(std::cell::Cell::new(None));
    let sink = seen.clone();
    let policy = FnPolicy::new(move |view, _| {
        sink.set(view.volatility.map(|sample| sample.second));
    });

    let events = oscillating_session(600, TEN, 5);
    let volatility = VolatilityContext::build(&events);
    let config = SimConfig {
        vol_refresh_interval: 50,
        ..SimConfig::default()
    };
    let mut engine = Engine::with_config(NoFill, policy, config, volatility).unwrap();
    engine.run(VecFeed::new(events)).unwrap();

    // Last refresh at event 550, 55 seconds in
    assert_eq!(seen.get(), Some(55));
    assert_eq!(engine.stats().vol_refreshes, 12);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = SimConfig {
        vol_refresh_interval: 0,
        ..SimConfig::default()
    };
    let result = Engine::with_config(NoFill, Passive, config, VolatilityContext::default());
    assert!(matches!(result, Err(ReplayError::InvalidConfig { .. })));
}

#[test]
fn test_run_window_spans_first_to_last_event() {
    let events = oscillating_session(100, TEN, 3);
    let mut engine = Engine::new(NoFill, Passive, VolatilityContext::default());
    engine.run(VecFeed::new(events)).unwrap();

    let window = engine.run_window();
    assert_eq!(window.start, 0);
    assert_eq!(window.end, 99 * NANOS_PER_SEC / 10);
}
