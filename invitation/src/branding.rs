use crate::config::BrandingSettings;

const TIPS: [&str; 5] = [
    "Click anywhere to advance",
    "Swipe left/right on mobile",
    "Use arrow keys or spacebar",
    "Press R to restart",
    "Click dots to jump to scenes",
];

/// The startup banner: who, when, and how to get around.
pub fn welcome_lines(branding: &BrandingSettings) -> Vec<String> {
    let mut lines = vec![
        "Wedding Invitation".to_string(),
        branding.couple.clone(),
        branding.date_label.clone(),
        "Navigation Tips:".to_string(),
    ];
    lines.extend(TIPS.iter().map(|tip| format!("- {tip}")));
    lines
}

pub fn log_welcome(branding: &BrandingSettings) {
    for line in welcome_lines(branding) {
        tracing::info!("{line}");
    }
}
