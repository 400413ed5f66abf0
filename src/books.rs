//! Filename to canonical book-code mapping.
//!
//! Source files embed a numbered fragment like `19_Ps_T` in their names; the
//! table below maps each fragment to the short code used to name the output
//! artifact. The table is fixed at compile time and never mutated.

/// Fragment → output code, one entry per book. Order matters: lookup takes
/// the first fragment contained in the filename.
pub const BOOK_CODES: &[(&str, &str)] = &[
    ("01_Ge_T", "ge"),
    ("02_Ex_T", "ex"),
    ("03_Le_T", "le"),
    ("04_Nu_T", "nu"),
    ("05_De_T", "de"),
    ("06_Jos_T", "jos"),
    ("07_Jz_T", "jz"),
    ("08_Ru_T", "ru"),
    ("09_1Sa_T", "1sa"),
    ("10_2Sa_T", "2sa"),
    ("11_1Rs_T", "1rs"),
    ("12_2Rs_T", "2rs"),
    ("13_1Cr_T", "1cr"),
    ("14_2Cr_T", "2cr"),
    ("15_Esd_T", "esd"),
    ("16_Ne_T", "ne"),
    ("17_Est_T", "est"),
    ("18_Job_T", "job"),
    ("19_Ps_T", "sal"),
    ("20_Pr_T", "pr"),
    ("21_Ec_T", "ec"),
    ("22_Ca_T", "ca"),
    ("23_Is_T", "is"),
    ("24_Je_T", "je"),
    ("25_Lm_T", "lm"),
    ("26_Ez_T", "ez"),
    ("27_Da_T", "da"),
    ("28_Os_T", "os"),
    ("29_Jl_T", "jl"),
    ("30_Am_T", "am"),
    ("31_Ob_T", "ob"),
    ("32_Jn_T", "jn"),
    ("33_Mq_T", "mq"),
    ("34_Na_T", "na"),
    ("35_Hab_T", "hab"),
    ("36_Zf_T", "zf"),
    ("37_Ag_T", "ag"),
    ("38_Zc_T", "zc"),
    ("39_Ml_T", "ml"),
    ("40_Mt_T", "mt"),
    ("41_Mr_T", "mr"),
    ("42_Lu_T", "lu"),
    ("43_Jo_T", "jo"),
    ("44_At_T", "at"),
    ("45_Ro_T", "ro"),
    ("46_1Co_T", "1co"),
    ("47_2Co_T", "2co"),
    ("48_Gá_T", "ga"),
    ("49_Ef_T", "ef"),
    ("50_Fl_T", "flp"),
    ("51_Col_T", "col"),
    ("52_1Te_T", "1te"),
    ("53_2Te_T", "2te"),
    ("54_1Ti_T", "1ti"),
    ("55_2Ti_T", "2ti"),
    ("56_Tit_T", "tit"),
    ("57_Flm_T", "fm"),
    ("58_He_T", "he"),
    ("59_Tg_T", "tg"),
    ("60_1Pe_T", "1pe"),
    ("61_2Pe_T", "2pe"),
    ("62_1Jo_T", "1jo"),
    ("63_2Jo_T", "2jo"),
    ("64_3Jo_T", "3jo"),
    ("65_Jd_T", "jd"),
    ("66_Re_T", "re"),
];

/// Resolve a source filename to its output book code, if any fragment of the
/// table is contained in it.
pub fn lookup(file_name: &str) -> Option<&'static str> {
    BOOK_CODES
        .iter()
        .find(|(fragment, _)| file_name.contains(fragment))
        .map(|(_, code)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn lookup_matches_embedded_fragments() {
        assert_eq!(lookup("01_Ge_T.rtf"), Some("ge"));
        assert_eq!(lookup("backup-19_Ps_T-final.rtf"), Some("sal"));
        assert_eq!(lookup("48_Gá_T.rtf"), Some("ga"));
        assert_eq!(lookup("66_Re_T.rtf"), Some("re"));
    }

    #[test]
    fn unmapped_names_yield_none() {
        assert_eq!(lookup("notes.rtf"), None);
        assert_eq!(lookup("99_Xx_T.rtf"), None);
        assert_eq!(lookup(""), None);
    }

    #[test]
    fn table_covers_all_books_and_is_injective() {
        assert_eq!(BOOK_CODES.len(), 66);

        let fragments: HashSet<&str> = BOOK_CODES.iter().map(|(fragment, _)| *fragment).collect();
        assert_eq!(fragments.len(), BOOK_CODES.len());

        let codes: HashSet<&str> = BOOK_CODES.iter().map(|(_, code)| *code).collect();
        assert_eq!(codes.len(), BOOK_CODES.len());
    }
}
