use shared::protocol::Recommendation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconGradient {
    pub from: &'static str,
    pub to: &'static str,
}

pub const ICON_PALETTE: [IconGradient; 10] = [
    IconGradient { from: "#ec4899", to: "#be185d" },
    IconGradient { from: "#a855f7", to: "#7e22ce" },
    IconGradient { from: "#3b82f6", to: "#1d4ed8" },
    IconGradient { from: "#f472b6", to: "#a855f7" },
    IconGradient { from: "#c084fc", to: "#3b82f6" },
    IconGradient { from: "#60a5fa", to: "#ec4899" },
    IconGradient { from: "#ec4899", to: "#9333ea" },
    IconGradient { from: "#a855f7", to: "#2563eb" },
    IconGradient { from: "#3b82f6", to: "#db2777" },
    IconGradient { from: "#db2777", to: "#7e22ce" },
];

#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub rank: usize,
    pub initials: String,
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub length: String,
    pub album: String,
    pub release_date: String,
    pub score: String,
    pub similar_songs: Vec<String>,
    pub icon: IconGradient,
}

/// One row per recommendation, in service rank order.
pub fn present(results: &[Recommendation]) -> Vec<ResultRow> {
    results
        .iter()
        .enumerate()
        .map(|(index, recommendation)| {
            let metadata = &recommendation.metadata;
            ResultRow {
                rank: index + 1,
                initials: initials(&metadata.song),
                title: metadata.song.clone(),
                artist: metadata.artist.clone(),
                genre: primary_genre(&metadata.genre).to_string(),
                length: metadata.length.clone(),
                album: metadata.album.clone(),
                release_date: metadata.release_date.clone(),
                score: format_score(recommendation.score),
                similar_songs: metadata.similar_songs().map(str::to_string).collect(),
                icon: icon_for_row(index),
            }
        })
        .collect()
}

pub fn summary_line(count: usize) -> String {
    format!("Found {count} songs that match your taste")
}

/// First letter of each whitespace-separated word, uppercased, at most two.
/// Words without any letter contribute nothing, so a title like "1999" yields "".
pub fn initials(title: &str) -> String {
    title
        .split_whitespace()
        .filter_map(|word| word.chars().find(|c| c.is_alphabetic()))
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// Percentage with one decimal. An exact half tenth rounds up, never to even.
pub fn format_score(score: f64) -> String {
    let percent = score * 100.0;
    // Only x.25 and x.75 sit exactly on a half tenth in binary; scaling by 4 is exact.
    let quarters = percent * 4.0;
    if quarters.fract() == 0.0 && quarters.rem_euclid(2.0) == 1.0 {
        return format!("{:.1}%", (percent * 10.0).ceil() / 10.0);
    }
    format!("{percent:.1}%")
}

pub fn primary_genre(genre: &str) -> &str {
    genre.split(',').next().unwrap_or_default().trim()
}

pub fn icon_for_row(index: usize) -> IconGradient {
    ICON_PALETTE[index % ICON_PALETTE.len()]
}
