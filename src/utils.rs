const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

pub fn round_vote_average(score: f64) -> f64 {
    if !score.is_finite() {
        return 0.0;
    }
    (score * 10.0).round() / 10.0
}

pub fn image_url(path: &str, size: &str) -> String {
    format!("{IMAGE_BASE}/{size}{path}")
}

pub fn language_name(code: &str) -> String {
    let lower = code.trim().to_lowercase();
    let name = match lower.as_str() {
        "en" => "English",
        "es" => "Spanish",
        "fr" => "French",
        "de" => "German",
        "it" => "Italian",
        "ja" => "Japanese",
        "ko" => "Korean",
        "zh" | "cn" => "Chinese",
        "cmn" => "Mandarin",
        "yue" => "Cantonese",
        "hi" => "Hindi",
        "pt" => "Portuguese",
        "ar" => "Arabic",
        "af" => "Afrikaans",
        "tl" => "Tagalog",
        "pl" => "Polish",
        "ru" => "Russian",
        "tr" => "Turkish",
        "nl" => "Dutch",
        "da" => "Danish",
        "sv" => "Swedish",
        "no" => "Norwegian",
        "fi" => "Finnish",
        "th" => "Thai",
        "cs" => "Czech",
        "el" => "Greek",
        "he" => "Hebrew",
        "id" => "Indonesian",
        "ms" => "Malay",
        "fa" => "Persian",
        "vi" => "Vietnamese",
        "bn" => "Bengali",
        "ta" => "Tamil",
        "te" => "Telugu",
        "ml" => "Malayalam",
        "hu" => "Hungarian",
        "ro" => "Romanian",
        "uk" => "Ukrainian",
        "bg" => "Bulgarian",
        "hr" => "Croatian",
        "sr" => "Serbian",
        "sk" => "Slovak",
        "sl" => "Slovenian",
        "as" => "Assamese",
        _ => return lower.to_uppercase(),
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_scores_to_one_decimal() {
        assert_eq!(round_vote_average(7.349), 7.3);
        assert_eq!(round_vote_average(7.36), 7.4);
        assert_eq!(round_vote_average(0.0), 0.0);
        assert_eq!(round_vote_average(f64::NAN), 0.0);
    }

    #[test]
    fn language_names_fall_back_to_upper_code() {
        assert_eq!(language_name("en"), "English");
        assert_eq!(language_name("KO"), "Korean");
        assert_eq!(language_name("xx"), "XX");
    }

    #[test]
    fn builds_image_urls() {
        assert_eq!(
            image_url("/poster.jpg", "w500"),
            "https://image.tmdb.org/t/p/w500/poster.jpg"
        );
    }
}
