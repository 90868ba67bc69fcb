//! Fixed interface labels for the kiosk chrome.
//!
//! Record text is localized by the data source; these are the few strings the
//! kiosk itself draws. Unknown languages fall back to English.

/// Chrome strings for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub tap_hint: &'static str,
    pub fun_fact: &'static str,
    pub habitat: &'static str,
    pub back: &'static str,
    pub status_heading: &'static str,
    pub loading: &'static str,
}

const EN: Labels = Labels {
    tap_hint: "Tap to see more",
    fun_fact: "Fun Fact",
    habitat: "Habitat & Lifestyle",
    back: "✕ BACK",
    status_heading: "Conservation Status",
    loading: "Loading…",
};

const ES: Labels = Labels {
    tap_hint: "Toca para ver más",
    fun_fact: "Dato curioso",
    habitat: "Hábitat y estilo de vida",
    back: "✕ VOLVER",
    status_heading: "Estado de conservación",
    loading: "Cargando…",
};

const FR: Labels = Labels {
    tap_hint: "Touchez pour en savoir plus",
    fun_fact: "Le saviez-vous ?",
    habitat: "Habitat et mode de vie",
    back: "✕ RETOUR",
    status_heading: "Statut de conservation",
    loading: "Chargement…",
};

/// Labels for `lang`, English when the language has no catalog entry.
pub fn labels(lang: &str) -> &'static Labels {
    match lang {
        "es" => &ES,
        "fr" => &FR,
        _ => &EN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_english() {
        assert_eq!(labels("xx"), &EN);
        assert_eq!(labels("es").fun_fact, "Dato curioso");
    }
}
