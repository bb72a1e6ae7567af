//! Unit tests for the enrichment orchestrator, including the end-to-end
//! scenarios for a single instrument.

#[cfg(test)]
mod enrichment_tests {
    use crate::config::PipelineConfig;
    use crate::data::history::HistorySnapshot;
    use crate::data::instruments::Instrument;
    use crate::error::SignalError;
    use crate::events::FeedEvent;
    use crate::services::enrichment::{Dispatch, SignalContext};
    use crate::signal::{Confidence, Direction};
    use chrono::{DateTime, Utc};
    use serde_json::{json, Value};

    fn t(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    fn signal_a() -> Value {
        json!({
            "stock": 738561,
            "pattern": "Bullish Engulfing",
            "direction": "Long",
            "entry": 100.0,
            "stopLoss": 98.0,
            "target1": 104.0,
            "spread": 0.4,
            "liquidity": 1200.0,
            "liveTickData": {
                "total_buy_quantity": 500,
                "total_sell_quantity": 200,
                "depth": {
                    "buy": [{"price": 101.0, "quantity": 50, "orders": 3}],
                    "sell": [{"price": 102.0, "quantity": 40, "orders": 2}]
                }
            }
        })
    }

    fn short_signal() -> Value {
        json!({
            "stock": 738561,
            "pattern": "Shooting Star",
            "direction": "Short",
            "entry": 100.0,
            "stopLoss": 102.0,
            "target1": 96.0,
            "spread": 0.8,
            "liquidity": 600.0
        })
    }

    #[test]
    fn test_end_to_end_scenarios() {
        let mut ctx = SignalContext::default();

        // A: clean long with a supportive book
        let a = ctx.enrich_payload(signal_a(), t(0)).unwrap();
        assert_eq!(a.confidence, Confidence::High);
        assert_eq!(a.best_bid, Some(101.0));
        assert_eq!(a.best_ask, Some(102.0));
        assert!(a.depth_check_passed);
        assert!(!a.conflict);

        // B: opposite direction 60s later
        let b = ctx.enrich_payload(short_signal(), t(60_000)).unwrap();
        assert!(b.conflict);
        assert_eq!(b.confidence, Confidence::Medium);

        // C: A has aged out, B agrees with C
        let c = ctx.enrich_payload(short_signal(), t(200_000)).unwrap();
        assert!(!c.conflict);
        let retained: Vec<i64> = ctx.history().entries(738561).iter().map(|e| e.timestamp).collect();
        assert_eq!(retained, vec![60_000, 200_000]);

        // D: no depth snapshot on a different instrument
        let d = ctx
            .enrich_payload(
                json!({"stock": 408065, "pattern": "Doji", "direction": "Long",
                       "entry": 100.0, "stopLoss": 99.0, "target1": 102.0}),
                t(210_000),
            )
            .unwrap();
        assert_eq!(d.total_buy, 0.0);
        assert_eq!(d.total_sell, 0.0);
        assert_eq!(d.best_bid, None);
        assert_eq!(d.best_ask, None);
        assert!(!d.depth_check_passed);
        assert_eq!(d.confidence, Confidence::Low);

        // Output is newest first
        let ids: Vec<_> = ctx.signals().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![d.id, c.id, b.id, a.id]);
    }

    #[test]
    fn test_enriched_fields() {
        let mut ctx = SignalContext::default();
        ctx.apply_instruments(&[Instrument { name: "RELIANCE".to_string(), token: 738561 }], t(0));

        let s = ctx.enrich_payload(signal_a(), t(5_000)).unwrap();
        assert_eq!(s.stock_name, "RELIANCE");
        assert_eq!(s.stock, 738561);
        assert_eq!(s.direction, Direction::Long);
        assert_eq!(s.total_buy, 500.0);
        assert_eq!(s.total_sell, 200.0);
        assert_eq!(s.target1, 104.0);
        assert_eq!(s.enriched_at, t(5_000));
        assert_eq!(s.ai.plan, "Buy at ₹100, SL ₹98, TGT ₹104");
        assert_eq!(s.ai.confidence_review, "Confidence: High");

        let history = ctx.history().entries(738561);
        assert_eq!(history[0].stock, "RELIANCE");
        assert_eq!(history[0].pattern, "Bullish Engulfing");
        assert_eq!(history[0].timestamp, 5_000);
    }

    #[test]
    fn test_unknown_instrument_uses_fallback_label() {
        let mut ctx = SignalContext::default();
        let s = ctx.enrich_payload(signal_a(), t(0)).unwrap();
        assert_eq!(s.stock_name, "Token 738561");
    }

    #[test]
    fn test_caller_ai_text_is_kept() {
        let mut payload = signal_a();
        payload["ai"] = json!({"explanation": "Breakout above VWAP", "advisory": "Half size"});

        let mut ctx = SignalContext::default();
        let s = ctx.enrich_payload(payload, t(0)).unwrap();
        assert_eq!(s.ai.explanation, "Breakout above VWAP");
        assert_eq!(s.ai.advisory, "Half size");
        assert_eq!(s.ai.confidence_review, "Confidence: High");
    }

    #[test]
    fn test_malformed_signal_rejected_without_side_effects() {
        let mut ctx = SignalContext::default();
        ctx.enrich_payload(signal_a(), t(0)).unwrap();

        let mut missing_direction = short_signal();
        missing_direction.as_object_mut().unwrap().remove("direction");
        let err = ctx.enrich_payload(missing_direction, t(1_000)).unwrap_err();
        assert!(matches!(err, SignalError::MissingField { field: "direction" }));

        let mut missing_entry = short_signal();
        missing_entry.as_object_mut().unwrap().remove("entry");
        let err = ctx.enrich_payload(missing_entry, t(2_000)).unwrap_err();
        assert!(matches!(err, SignalError::MissingField { field: "entry" }));

        assert_eq!(ctx.signals().len(), 1);
        assert_eq!(ctx.history().entries(738561).len(), 1);
        assert!(ctx.messages()[0].contains("❌ Rejected signal"));

        // A valid short afterwards still sees the original long
        assert!(ctx.enrich_payload(short_signal(), t(3_000)).unwrap().conflict);
    }

    #[test]
    fn test_wrong_types_rejected() {
        let mut ctx = SignalContext::default();
        let err = ctx
            .enrich_payload(json!({"stock": "abc", "direction": "Long", "entry": 1.0}), t(0))
            .unwrap_err();
        assert!(matches!(err, SignalError::Payload(_)));
        assert!(ctx.history().is_empty());
    }

    #[test]
    fn test_gaps_in_optional_data_never_reject() {
        let variants = vec![
            json!({"depth": {"buy": [{"quantity": 10}], "sell": []}}),
            json!({"depth": {"buy": null, "sell": null}}),
            json!({"depth": {"buy": [{"price": 101.0, "orders": -1}], "sell": [{"price": 102.0, "quantity": "n/a"}]}}),
            json!({"depth": "unavailable", "liveRSI": null}),
            json!("stale"),
        ];

        let mut ctx = SignalContext::default();
        for (i, tick) in variants.into_iter().enumerate() {
            let mut payload = signal_a();
            payload["liveTickData"] = tick;
            let s = ctx.enrich_payload(payload, t(i as i64 * 1_000)).unwrap();
            assert_eq!(s.stock, 738561);
        }

        let mut payload = signal_a();
        payload["spread"] = json!("wide");
        payload["ai"] = json!(42);
        let s = ctx.enrich_payload(payload, t(10_000)).unwrap();
        assert_eq!(s.confidence, Confidence::Low);
        assert_eq!(s.ai.advisory, "Use proper risk management.");

        assert_eq!(ctx.signals().len(), 6);
    }

    #[test]
    fn test_instrument_id_as_string_is_accepted() {
        let mut ctx = SignalContext::default();
        ctx.apply_instruments(&[Instrument { name: "RELIANCE".to_string(), token: 738561 }], t(0));
        let mut payload = signal_a();
        payload["stock"] = json!(" 738561");

        let s = ctx.enrich_payload(payload, t(0)).unwrap();
        assert_eq!(s.stock, 738561);
        assert_eq!(s.stock_name, "RELIANCE");
    }

    #[test]
    fn test_handle_lifecycle_events() {
        let mut ctx = SignalContext::default();

        let cases = vec![
            (FeedEvent::Connected, "✅ Connected to backend"),
            (FeedEvent::Disconnected, "❌ Disconnected from backend"),
            (FeedEvent::ConnectError("timeout".to_string()), "❌ Connection error: timeout"),
            (FeedEvent::ServerMessage("Market open".to_string()), "ℹ️ Market open"),
        ];
        for (event, expected) in cases {
            match ctx.handle(event, t(0)).unwrap() {
                Dispatch::Status(line) => assert_eq!(line, format!("[00:00:00] {}", expected)),
                other => panic!("Expected status, got {:?}", other),
            }
        }
        assert_eq!(ctx.messages().len(), 4);
        assert!(ctx.signals().is_empty());
    }

    #[test]
    fn test_handle_trade_signal() {
        let mut ctx = SignalContext::default();
        match ctx.handle(FeedEvent::TradeSignal(signal_a()), t(0)).unwrap() {
            Dispatch::Enriched(s) => assert_eq!(s.pattern, "Bullish Engulfing"),
            other => panic!("Expected enriched signal, got {:?}", other),
        }
        assert_eq!(ctx.messages()[0], "[00:00:00] 🚀 Signal for Token 738561 (Bullish Engulfing)");
    }

    #[test]
    fn test_custom_window() {
        let config = PipelineConfig {
            retention_window_ms: 10_000,
            message_limit: 50,
            signal_limit: None,
        };
        let mut ctx = SignalContext::new(&config);
        ctx.enrich_payload(signal_a(), t(0)).unwrap();
        assert!(!ctx.enrich_payload(short_signal(), t(10_000)).unwrap().conflict);
    }

    #[test]
    fn test_signal_limit_keeps_newest() {
        let config = PipelineConfig {
            signal_limit: Some(2),
            ..PipelineConfig::default()
        };
        let mut ctx = SignalContext::new(&config);
        let first = ctx.enrich_payload(signal_a(), t(0)).unwrap();
        let second = ctx.enrich_payload(short_signal(), t(1_000)).unwrap();
        let third = ctx.enrich_payload(signal_a(), t(2_000)).unwrap();

        let ids: Vec<_> = ctx.signals().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![third.id, second.id]);
        assert!(!ids.contains(&first.id));
        // History is bounded by the window, not by the display cap
        assert_eq!(ctx.history().entries(738561).len(), 3);
    }

    #[test]
    fn test_apply_history_feeds_conflicts() {
        let mut ctx = SignalContext::default();
        let snapshot: HistorySnapshot = serde_json::from_value(json!({
            "738561": [{"stock": "RELIANCE", "pattern": "Hammer", "direction": "Long", "timestamp": 90_000}]
        }))
        .unwrap();

        assert_eq!(ctx.apply_history(snapshot, t(100_000)), 1);
        assert!(ctx.enrich_payload(short_signal(), t(120_000)).unwrap().conflict);
    }

    #[test]
    fn test_contexts_are_isolated() {
        let mut first = SignalContext::default();
        let mut second = SignalContext::default();

        first.enrich_payload(signal_a(), t(0)).unwrap();
        assert!(!second.enrich_payload(short_signal(), t(1_000)).unwrap().conflict);
    }
}
