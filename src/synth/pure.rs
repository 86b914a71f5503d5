//! Pure Synthesis
//!
//! Composes a record from independently sampled parts for a resolved
//! OS/browser pair. Each attribute prefers a corpus observation for the OS
//! category and otherwise falls back to the curated pools.

use crate::fingerprint::navigator::{
    default_mime_library, default_plugin_library, product_sub_for, NavigatorInfo,
};
use crate::fingerprint::os::{classify_os, OsCategory};
use crate::fingerprint::record::{FingerprintRecord, ScreenInfo};
use crate::fingerprint::webgl::{GpuProfile, WebGlInfo};
use crate::sampling::compat::{
    browser_display_name, is_chromium_browser, is_mobile_only_browser, ResolvedBrowser,
    ResolvedOs,
};
use crate::sampling::prng::Prng;
use crate::synth::attributes::{
    apply_version_overlay, fill_screen, fresh_canvas_token, normalize_webgl_flags, pick_value,
    random_subset, sample_languages, sample_timezone,
};
use crate::synth::pools::{
    audio_presets, default_features, default_os_version, device_memory_pool, do_not_track_pool,
    feature_flip_probability, hardware_concurrency_pool, platforms_for, render_user_agent,
    screen_presets, touch_points_pool, user_agent_template, vendor_for, ANDROID_DEVICES,
    DESKTOP_DEFAULTS, MOBILE_DEFAULTS,
};
use crate::synth::{Draft, SynthSession};

/// Chance of taking the screen from the corpus
const CORPUS_SCREEN_PROBABILITY: f64 = 0.7;

/// Chance of taking WebGL, canvas and audio from the corpus
const CORPUS_MEDIA_PROBABILITY: f64 = 0.6;

/// Draw from `candidates` with probability `p`
fn from_corpus<T: Clone>(rng: &mut Prng, p: f64, candidates: &[T]) -> Option<T> {
    if rng.chance(p) {
        rng.pick(candidates).cloned()
    } else {
        None
    }
}

/// First non-empty candidate list
fn first_non_empty<'a, T>(lists: &[&'a [T]]) -> &'a [T] {
    lists.iter().copied().find(|l| !l.is_empty()).unwrap_or(&[])
}

/// Whether a corpus navigator describes the target OS
fn template_matches_os(template: &NavigatorInfo, os: OsCategory) -> bool {
    classify_os(&template.platform, &template.user_agent, "") == os
}

/// Build a record from sampled parts
pub fn synthesize(
    session: &SynthSession,
    os: &ResolvedOs,
    browser: &ResolvedBrowser,
    rng: &mut Prng,
) -> Draft {
    let aggregates = session.aggregates();
    let tables = session.tables();
    let category = os.category;
    let key = browser.key.as_str();
    let mobile = category.is_mobile();
    let chromium = is_chromium_browser(key);

    let (languages, language_label) = sample_languages(tables, aggregates, category, rng);
    let (timezone, timezone_label) = sample_timezone(tables, aggregates, category, rng);

    // Hardware
    let (default_cores, default_memory, default_touch) = if mobile {
        MOBILE_DEFAULTS
    } else {
        DESKTOP_DEFAULTS
    };
    let cores = pick_value(
        rng,
        aggregates.hardware_concurrency.for_os(category),
        hardware_concurrency_pool(category),
    )
    .unwrap_or(default_cores);
    let memory = pick_value(
        rng,
        aggregates.device_memory.for_os(category),
        device_memory_pool(category),
    )
    .unwrap_or(default_memory);
    let touch_points = pick_value(
        rng,
        aggregates.max_touch_points.for_os(category),
        touch_points_pool(category),
    )
    .unwrap_or(default_touch);
    let do_not_track = match rng.pick(aggregates.do_not_track.for_os(category)) {
        Some(value) => Some(value.clone()),
        None => rng
            .pick(do_not_track_pool(category))
            .copied()
            .flatten()
            .map(str::to_string),
    };

    // Navigator
    let platform = rng.pick(platforms_for(category)).copied().unwrap_or("Win32");
    let device = match category {
        OsCategory::Android => rng.pick(ANDROID_DEVICES).copied().unwrap_or("K"),
        OsCategory::Ios => platform,
        _ => "",
    };
    let user_agent = render_user_agent(
        &user_agent_template(key, category),
        default_os_version(category),
        device,
    );

    let mut navigator = NavigatorInfo {
        platform: platform.to_string(),
        vendor: vendor_for(key, category, chromium).to_string(),
        cookie_enabled: true,
        do_not_track,
        hardware_concurrency: Some(cores),
        device_memory: Some(memory),
        max_touch_points: touch_points,
        product: "Gecko".to_string(),
        product_sub: product_sub_for(key).to_string(),
        webdriver: false,
        ..Default::default()
    };
    navigator.set_user_agent(user_agent);
    navigator.set_languages(languages);

    if let Some(template) = rng.pick(aggregates.navigators.for_pair(category, key)) {
        if template_matches_os(template, category) {
            navigator.overlay_template(template);
        }
    }

    // Screen
    let screen = from_corpus(
        rng,
        CORPUS_SCREEN_PROBABILITY,
        aggregates.screens.for_os(category),
    )
    .unwrap_or_else(|| {
        let (width, height) = rng
            .pick(screen_presets(category))
            .copied()
            .unwrap_or((1920, 1080));
        ScreenInfo {
            width,
            height,
            avail_width: 0,
            avail_height: 0,
            color_depth: 0,
            pixel_depth: 0,
        }
    });
    let screen = fill_screen(screen, category, rng);

    // WebGL, canvas, audio
    let mut webgl = from_corpus(rng, CORPUS_MEDIA_PROBABILITY, aggregates.webgl.for_os(category))
        .unwrap_or_else(|| {
            let pool = GpuProfile::pool_for(category);
            let profile = rng.pick(&pool).copied().unwrap_or(GpuProfile::IntelUhd630);
            WebGlInfo::from_profile(&profile, chromium)
        });
    let canvas = from_corpus(rng, CORPUS_MEDIA_PROBABILITY, aggregates.canvas.for_os(category))
        .unwrap_or_else(|| fresh_canvas_token(rng));
    let audio = from_corpus(rng, CORPUS_MEDIA_PROBABILITY, aggregates.audio.for_os(category))
        .or_else(|| rng.pick(&audio_presets(category)).cloned())
        .unwrap_or_default();

    // Plugins and MIME types
    let (plugins, mime_types) = if mobile || is_mobile_only_browser(key) {
        (Vec::new(), Vec::new())
    } else {
        let plugin_source = rng
            .pick(first_non_empty(&[
                aggregates.plugins.for_pair(category, key),
                aggregates.plugins.for_browser(key),
            ]))
            .cloned()
            .unwrap_or_else(default_plugin_library);
        let mime_source = rng
            .pick(first_non_empty(&[
                aggregates.mime_types.for_pair(category, key),
                aggregates.mime_types.for_browser(key),
            ]))
            .cloned()
            .unwrap_or_else(default_mime_library);
        (
            random_subset(rng, &plugin_source, |p| p.name.clone()),
            random_subset(rng, &mime_source, |m| m.mime_type.clone()),
        )
    };

    // Feature flags
    let mut features = rng
        .pick(aggregates.features.for_browser(key))
        .cloned()
        .unwrap_or_else(|| default_features(mobile));
    for (name, enabled) in features.iter_mut() {
        if rng.chance(feature_flip_probability(name)) {
            *enabled = !*enabled;
        }
    }
    normalize_webgl_flags(&mut features);
    if features.get("webgl") == Some(&false) {
        webgl.supported = false;
    }

    let versions = apply_version_overlay(&mut navigator, tables, category, key, rng);

    let record = FingerprintRecord {
        navigator,
        screen: Some(screen),
        timezone: Some(timezone),
        webgl: Some(webgl),
        canvas: Some(canvas),
        audio: Some(audio),
        plugins,
        mime_types,
        features,
        browser_name: browser_display_name(key),
        os_category: Some(category),
        synthetic: false,
        source: None,
        generated_at: None,
        id: None,
        source_metadata: None,
    };

    Draft {
        record,
        os: category,
        os_label: os.label.clone(),
        browser_key: browser.key.clone(),
        browser_label: browser.label.clone(),
        language: language_label,
        timezone: timezone_label,
        versions,
        base_template: None,
    }
}
