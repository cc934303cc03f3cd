//! Release scorer.

use crate::release::Release;

use super::{QualityScore, QualityTier};

/// Bonus for any HDR format.
pub const HDR_BONUS: i32 = 20;
/// Bonus for Blu-ray sources.
pub const BLURAY_BONUS: i32 = 15;
/// Bonus for web sources.
pub const WEB_BONUS: i32 = 10;
/// Bonus for HDTV captures.
pub const HDTV_BONUS: i32 = 5;
/// Bonus for x265/HEVC encodes.
pub const HEVC_BONUS: i32 = 10;

/// Resolve the tier from a free-form resolution string.
///
/// Matching is a case-insensitive substring test, checked from the highest
/// tier down, so "fhd" resolves to FHD before the "hd" rule is reached.
pub fn tier_for_resolution(resolution: Option<&str>) -> QualityTier {
    let Some(resolution) = resolution else {
        return QualityTier::Sd;
    };
    let resolution = resolution.to_lowercase();

    if resolution.contains("2160p") || resolution.contains("4k") {
        QualityTier::Uhd
    } else if resolution.contains("1080p") || resolution.contains("fhd") {
        QualityTier::Fhd
    } else if resolution.contains("720p") || resolution.contains("hd") {
        QualityTier::Hd
    } else {
        QualityTier::Sd
    }
}

/// Bonus for the release source. First match wins: bluray, web, hdtv.
pub fn source_bonus(source: Option<&str>) -> i32 {
    let Some(source) = source else {
        return 0;
    };
    let source = source.to_lowercase();

    if source.contains("bluray") || source.contains("bd") {
        BLURAY_BONUS
    } else if source.contains("web") {
        WEB_BONUS
    } else if source.contains("hdtv") {
        HDTV_BONUS
    } else {
        0
    }
}

/// Whether any codec entry names x265 or HEVC.
pub fn is_hevc(codecs: &[String]) -> bool {
    codecs.iter().any(|codec| {
        let codec = codec.to_lowercase();
        codec.contains("x265") || codec.contains("hevc")
    })
}

/// Score a release. Total over all inputs: a release with nothing parsed
/// scores the SD base.
pub fn score_release(release: &Release) -> QualityScore {
    let level = tier_for_resolution(release.resolution.as_deref());
    let hdr = release.has_hdr();

    let mut score = level.base_score();
    if hdr {
        score += HDR_BONUS;
    }
    score += source_bonus(release.source.as_deref());
    if is_hevc(&release.codec) {
        score += HEVC_BONUS;
    }

    let label = if hdr && level == QualityTier::Uhd {
        format!("{} HDR", level.label())
    } else {
        level.label().to_string()
    };

    QualityScore {
        score,
        level,
        hdr,
        label,
        color_hint: level.color_hint(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::ColorHint;

    #[test]
    fn test_empty_release_scores_sd_floor() {
        let score = score_release(&Release::new("h", "Nothing Parsed"));
        assert_eq!(score.score, 25);
        assert_eq!(score.level, QualityTier::Sd);
        assert_eq!(score.label, "SD");
        assert_eq!(score.color_hint, ColorHint::Gray);
        assert!(!score.hdr);
    }

    #[test]
    fn test_uhd_hdr_bluray_hevc() {
        let release = Release::new("a", "A")
            .with_resolution("2160p")
            .with_hdr("HDR10")
            .with_source("bluray")
            .with_codec("x265");
        let score = score_release(&release);

        assert_eq!(score.score, 145);
        assert_eq!(score.level, QualityTier::Uhd);
        assert_eq!(score.label, "4K HDR");
        assert_eq!(score.color_hint, ColorHint::Purple);
    }

    #[test]
    fn test_fhd_web() {
        let release = Release::new("b", "B")
            .with_resolution("1080p")
            .with_source("web");
        let score = score_release(&release);

        assert_eq!(score.score, 85);
        assert_eq!(score.level, QualityTier::Fhd);
        assert_eq!(score.label, "1080p");
    }

    #[test]
    fn test_hdr_suffix_only_on_uhd() {
        let release = Release::new("c", "C")
            .with_resolution("1080p")
            .with_hdr("DV");
        let score = score_release(&release);

        assert_eq!(score.score, 95);
        assert_eq!(score.label, "1080p");
        assert!(score.hdr);
    }

    #[test]
    fn test_tier_matching_is_case_insensitive_substring() {
        assert_eq!(tier_for_resolution(Some("4K")), QualityTier::Uhd);
        assert_eq!(tier_for_resolution(Some("UHD 2160P")), QualityTier::Uhd);
        assert_eq!(tier_for_resolution(Some("FHD")), QualityTier::Fhd);
        assert_eq!(tier_for_resolution(Some("720P")), QualityTier::Hd);
        assert_eq!(tier_for_resolution(Some("HD")), QualityTier::Hd);
        assert_eq!(tier_for_resolution(Some("480p")), QualityTier::Sd);
        assert_eq!(tier_for_resolution(None), QualityTier::Sd);
    }

    #[test]
    fn test_source_bonus_priority() {
        assert_eq!(source_bonus(Some("BluRay")), BLURAY_BONUS);
        assert_eq!(source_bonus(Some("BDRip")), BLURAY_BONUS);
        assert_eq!(source_bonus(Some("WEB-DL")), WEB_BONUS);
        assert_eq!(source_bonus(Some("HDTV")), HDTV_BONUS);
        assert_eq!(source_bonus(Some("dvd")), 0);
        assert_eq!(source_bonus(None), 0);
    }

    #[test]
    fn test_hevc_detection() {
        assert!(is_hevc(&["H264".to_string(), "HEVC".to_string()]));
        assert!(is_hevc(&["x265 10bit".to_string()]));
        assert!(!is_hevc(&["x264".to_string()]));
        assert!(!is_hevc(&[]));
    }

    #[test]
    fn test_tier_ordering() {
        assert!(QualityTier::Sd < QualityTier::Hd);
        assert!(QualityTier::Hd < QualityTier::Fhd);
        assert!(QualityTier::Fhd < QualityTier::Uhd);
    }
}
