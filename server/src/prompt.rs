pub const REPORT_SECTIONS: [&str; 4] = [
    "Executive Summary",
    "Side A Analysis",
    "Side B Analysis",
    "Sociological Conclusion",
];

/// Instructions sent ahead of the snapshot. The left half belongs to
/// `topic_a`, the right half to `topic_b`.
pub fn analysis_prompt(topic_a: &str, topic_b: &str) -> String {
    let sections = REPORT_SECTIONS
        .iter()
        .map(|section| format!("\"{section}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "You are a sociological AI expert analyzing a visual debate canvas called 'PixelDebate'.\n\
         The canvas is split in two.\n\
         Left side represents: \"{topic_a}\"\n\
         Right side represents: \"{topic_b}\"\n\
         \n\
         Analyze the visual data (drawings, density, colors, symbols) on both sides.\n\
         Provide a professional sociological synthesis.\n\
         Compare the intensity, types of arguments (abstract vs concrete), and overall visual sentiment.\n\
         Format your response in Markdown with clear sections: {sections}.\n"
    )
}
