//! WebGL Profiles
//!
//! The `webgl` section of a fingerprint record and the curated GPU pools the
//! synthesizer falls back to when the corpus has no WebGL sample for an OS.
//!
//! The unmasked renderer string is one of the most identifying values in a
//! fingerprint, so each pool only holds GPUs that actually ship on that OS.
//!
//! # Example
//!
//! ```rust
//! use fingerprint_synth::fingerprint::{os::OsCategory, webgl::{GpuProfile, WebGlInfo}};
//!
//! let pool = GpuProfile::pool_for(OsCategory::MacOs);
//! let info = WebGlInfo::from_profile(&pool[0], true);
//! assert!(info.renderer.contains("Apple"));
//! ```

use serde::{Deserialize, Serialize};

use crate::fingerprint::os::OsCategory;

/// Curated GPU profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuProfile {
    // NVIDIA profiles
    NvidiaGtx1660,
    NvidiaRtx3060,
    NvidiaRtx3080,
    NvidiaRtx4070,

    // AMD profiles
    AmdRx580,
    AmdRx6700Xt,

    // Intel integrated graphics
    IntelUhd620,
    IntelUhd630,
    IntelIrisXe,

    // Apple Silicon
    AppleM1,
    AppleM2,
    AppleM3,

    // Linux Mesa drivers
    MesaIntelUhd630,
    MesaAmdRadeon,

    // Mobile
    AdrenoA740,
    AdrenoA650,
    MaliG78,
    AppleGpu,
}

impl GpuProfile {
    /// GPUs that plausibly appear on the given OS
    pub fn pool_for(os: OsCategory) -> Vec<GpuProfile> {
        match os {
            OsCategory::Windows | OsCategory::Others => vec![
                GpuProfile::NvidiaGtx1660,
                GpuProfile::NvidiaRtx3060,
                GpuProfile::NvidiaRtx3080,
                GpuProfile::NvidiaRtx4070,
                GpuProfile::AmdRx580,
                GpuProfile::AmdRx6700Xt,
                GpuProfile::IntelUhd620,
                GpuProfile::IntelUhd630,
                GpuProfile::IntelIrisXe,
            ],
            OsCategory::MacOs => vec![GpuProfile::AppleM1, GpuProfile::AppleM2, GpuProfile::AppleM3],
            OsCategory::Linux => vec![
                GpuProfile::MesaIntelUhd630,
                GpuProfile::MesaAmdRadeon,
                GpuProfile::NvidiaRtx3060,
            ],
            OsCategory::Android => vec![
                GpuProfile::AdrenoA740,
                GpuProfile::AdrenoA650,
                GpuProfile::MaliG78,
            ],
            OsCategory::Ios => vec![GpuProfile::AppleGpu],
        }
    }

    /// Low-level GL vendor (`UNMASKED_VENDOR_WEBGL`)
    pub fn gl_vendor(&self) -> &'static str {
        match self {
            GpuProfile::NvidiaGtx1660
            | GpuProfile::NvidiaRtx3060
            | GpuProfile::NvidiaRtx3080
            | GpuProfile::NvidiaRtx4070 => "Google Inc. (NVIDIA)",
            GpuProfile::AmdRx580 | GpuProfile::AmdRx6700Xt => "Google Inc. (AMD)",
            GpuProfile::IntelUhd620 | GpuProfile::IntelUhd630 | GpuProfile::IntelIrisXe => {
                "Google Inc. (Intel)"
            }
            GpuProfile::AppleM1 | GpuProfile::AppleM2 | GpuProfile::AppleM3 => {
                "Google Inc. (Apple)"
            }
            GpuProfile::MesaIntelUhd630 => "Intel",
            GpuProfile::MesaAmdRadeon => "AMD",
            GpuProfile::AdrenoA740 | GpuProfile::AdrenoA650 => "Qualcomm",
            GpuProfile::MaliG78 => "ARM",
            GpuProfile::AppleGpu => "Apple Inc.",
        }
    }

    /// Low-level GL renderer (`UNMASKED_RENDERER_WEBGL`)
    pub fn gl_renderer(&self) -> &'static str {
        match self {
            GpuProfile::NvidiaGtx1660 => {
                "ANGLE (NVIDIA, NVIDIA GeForce GTX 1660 SUPER Direct3D11 vs_5_0 ps_5_0, D3D11)"
            }
            GpuProfile::NvidiaRtx3060 => {
                "ANGLE (NVIDIA, NVIDIA GeForce RTX 3060 Direct3D11 vs_5_0 ps_5_0, D3D11)"
            }
            GpuProfile::NvidiaRtx3080 => {
                "ANGLE (NVIDIA, NVIDIA GeForce RTX 3080 Direct3D11 vs_5_0 ps_5_0, D3D11)"
            }
            GpuProfile::NvidiaRtx4070 => {
                "ANGLE (NVIDIA, NVIDIA GeForce RTX 4070 Direct3D11 vs_5_0 ps_5_0, D3D11)"
            }
            GpuProfile::AmdRx580 => {
                "ANGLE (AMD, AMD Radeon RX 580 Series Direct3D11 vs_5_0 ps_5_0, D3D11)"
            }
            GpuProfile::AmdRx6700Xt => {
                "ANGLE (AMD, AMD Radeon RX 6700 XT Direct3D11 vs_5_0 ps_5_0, D3D11)"
            }
            GpuProfile::IntelUhd620 => {
                "ANGLE (Intel, Intel(R) UHD Graphics 620 Direct3D11 vs_5_0 ps_5_0, D3D11)"
            }
            GpuProfile::IntelUhd630 => {
                "ANGLE (Intel, Intel(R) UHD Graphics 630 Direct3D11 vs_5_0 ps_5_0, D3D11)"
            }
            GpuProfile::IntelIrisXe => {
                "ANGLE (Intel, Intel(R) Iris(R) Xe Graphics Direct3D11 vs_5_0 ps_5_0, D3D11)"
            }
            GpuProfile::AppleM1 => "ANGLE (Apple, ANGLE Metal Renderer: Apple M1, Unspecified Version)",
            GpuProfile::AppleM2 => "ANGLE (Apple, ANGLE Metal Renderer: Apple M2, Unspecified Version)",
            GpuProfile::AppleM3 => "ANGLE (Apple, ANGLE Metal Renderer: Apple M3, Unspecified Version)",
            GpuProfile::MesaIntelUhd630 => "Mesa Intel(R) UHD Graphics 630 (CFL GT2)",
            GpuProfile::MesaAmdRadeon => "AMD Radeon RX 6600 (radeonsi, navi23, LLVM 15.0.7, DRM 3.49)",
            GpuProfile::AdrenoA740 => "Adreno (TM) 740",
            GpuProfile::AdrenoA650 => "Adreno (TM) 650",
            GpuProfile::MaliG78 => "Mali-G78",
            GpuProfile::AppleGpu => "Apple GPU",
        }
    }
}

/// The `webgl` section of a fingerprint record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebGlInfo {
    pub supported: bool,
    /// Masked vendor (`VENDOR`)
    pub vendor: String,
    /// Masked renderer (`RENDERER`)
    pub renderer: String,
    pub gl_vendor: String,
    pub gl_renderer: String,
    pub gl_version: String,
    pub shading_language_version: String,
}

impl Default for WebGlInfo {
    fn default() -> Self {
        Self {
            supported: false,
            vendor: String::new(),
            renderer: String::new(),
            gl_vendor: String::new(),
            gl_renderer: String::new(),
            gl_version: String::new(),
            shading_language_version: String::new(),
        }
    }
}

impl WebGlInfo {
    /// Build a WebGL section from a curated profile.
    ///
    /// Chromium-based browsers report the masked vendor/renderer as
    /// `WebKit`/`WebKit WebGL` and append `Chromium` to the version strings.
    pub fn from_profile(profile: &GpuProfile, chromium: bool) -> Self {
        let (version, shading) = if chromium {
            (
                "WebGL 1.0 (OpenGL ES 2.0 Chromium)",
                "WebGL GLSL ES 1.0 (OpenGL ES GLSL ES 1.0 Chromium)",
            )
        } else {
            ("WebGL 1.0", "WebGL GLSL ES 1.0")
        };
        let (vendor, renderer) = if chromium {
            ("WebKit", "WebKit WebGL")
        } else {
            ("Mozilla", "Mozilla")
        };

        Self {
            supported: true,
            vendor: vendor.to_string(),
            renderer: renderer.to_string(),
            gl_vendor: profile.gl_vendor().to_string(),
            gl_renderer: profile.gl_renderer().to_string(),
            gl_version: version.to_string(),
            shading_language_version: shading.to_string(),
        }
    }

    /// Vendor used for identity hashing: the unmasked one when known
    pub fn effective_vendor(&self) -> &str {
        if self.gl_vendor.is_empty() {
            &self.vendor
        } else {
            &self.gl_vendor
        }
    }

    /// Renderer used for identity hashing: the unmasked one when known
    pub fn effective_renderer(&self) -> &str {
        if self.gl_renderer.is_empty() {
            &self.renderer
        } else {
            &self.gl_renderer
        }
    }
}
