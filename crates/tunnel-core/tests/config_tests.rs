// Host-side tests for URL-derived configuration.

use tunnel_core::*;

#[test]
fn empty_location_gives_defaults() {
    let cfg = TunnelConfig::from_location("", "");
    assert_eq!(cfg, TunnelConfig::default());
    assert_eq!(cfg.spacing, SPACING);
    assert_eq!(cfg.track_url, DEFAULT_TRACK_URL);
    assert_eq!(cfg.tempo, TempoSource::Estimate);
    assert!(cfg.rejected.is_empty());
    assert!(!cfg.debug);
}

#[test]
fn defaults_match_post_processing_constants() {
    let cfg = TunnelConfig::default();
    assert_eq!(cfg.bloom.strength, 0.3);
    assert_eq!(cfg.bloom.threshold, 0.7);
    assert_eq!(cfg.bloom.radius, 0.5);
    assert_eq!(cfg.trail_damp, 0.6);
    assert_eq!(cfg.analysis, AnalysisWindow::default());
}

#[test]
fn query_overrides_are_applied() {
    let cfg = TunnelConfig::from_location("?bpm=126&seed=7&track=sounds/other.mp3", "");
    assert_eq!(cfg.tempo, TempoSource::Fixed(126.0));
    assert_eq!(cfg.seed, 7);
    assert_eq!(cfg.track_url, "sounds/other.mp3");
}

#[test]
fn unknown_keys_and_empty_track_are_ignored() {
    let cfg = TunnelConfig::from_location("?foo=bar&track=&&x", "");
    assert_eq!(cfg.track_url, DEFAULT_TRACK_URL);
}

#[test]
fn invalid_tempo_override_is_rejected() {
    for search in ["?bpm=fast", "?bpm=0", "?bpm=-90", "?bpm=inf"] {
        let cfg = TunnelConfig::from_location(search, "");
        assert!(
            matches!(cfg.tempo, TempoSource::Rejected(_)),
            "{search} gave {:?}",
            cfg.tempo
        );
        assert_eq!(cfg.rejected.len(), 1);
    }
}

#[test]
fn malformed_key_keeps_the_other_overrides() {
    let cfg = TunnelConfig::from_location("?bpm=0&seed=7&track=x.mp3", "#debug");
    assert!(matches!(cfg.tempo, TempoSource::Rejected(_)));
    assert_eq!(cfg.seed, 7);
    assert_eq!(cfg.track_url, "x.mp3");
    assert!(cfg.debug);

    let cfg = TunnelConfig::from_location("?seed=-1&bpm=126", "");
    assert_eq!(cfg.seed, DEFAULT_SEED);
    assert_eq!(cfg.tempo, TempoSource::Fixed(126.0));
    assert_eq!(cfg.rejected.len(), 1);
}

#[test]
fn debug_comes_from_hash_or_query() {
    assert!(TunnelConfig::from_location("", "#debug").debug);
    assert!(TunnelConfig::from_location("?debug", "").debug);
    assert!(!TunnelConfig::from_location("", "#other").debug);
}
