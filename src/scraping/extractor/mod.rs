//! Per-journal record extraction from article pages
//!
//! Every journal renders its articles inside a `div.bodytext` container with
//! the citation pieces at fixed positions; only the abstract/JEL handling
//! differs per journal. Extraction is tolerant of missing structure: a
//! selector that matches nothing yields empty text, and the marker
//! heuristics degrade to "no codes" instead of failing. The only hard
//! failures are page fetches.

mod markers;

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

use crate::types::{JournalTag, Record};

use super::fetcher::FetchEngine;
use super::ScrapeError;

/// Separator between the title and the publication metadata in a citation
const CITATION_SEPARATOR: &str = ". ";

/// Errors while setting up extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector {0}")]
    Selector(String),
}

/// Result of parsing an article's primary page.
///
/// `followup` carries the full-text URL for journals whose classification
/// codes live on a secondary page; the record's codes are filled in after
/// that page is fetched.
#[derive(Debug)]
pub struct PrimaryExtraction {
    pub record: Record,
    pub followup: Option<String>,
}

/// Article page extractor with pre-compiled selectors, shared by all
/// journal pipelines.
pub struct RecordExtractor {
    /// Main text container of an article page
    body: Selector,
    /// Article title heading
    heading: Selector,
    /// Publication metadata paragraph
    citation_meta: Selector,
    /// Abstract paragraph
    abstract_para: Selector,
    /// Classification hyperlinks adjacent to an unmarked AER abstract
    aer_code_links: Selector,
    /// Full-text link on a RES article page
    res_paper_link: Selector,
    /// Classification list entries on a RES secondary page
    jel_entries: Selector,
}

impl RecordExtractor {
    /// Create a new extractor, compiling all structural selectors.
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            body: selector("div.bodytext")?,
            heading: selector("h1")?,
            citation_meta: selector("p:nth-child(5)")?,
            abstract_para: selector("p:nth-child(6)")?,
            aer_code_links: selector("p:nth-child(7) a")?,
            res_paper_link: selector("p:nth-child(8) a")?,
            jel_entries: selector("ul.jel li span a")?,
        })
    }

    /// Fetch an article page and extract its record, following the
    /// secondary full-text page where the journal requires it.
    pub async fn extract_record(
        &self,
        fetcher: &FetchEngine,
        journal: JournalTag,
        url: &Url,
    ) -> Result<Record, ScrapeError> {
        let html = fetcher
            .fetch_page(url)
            .await
            .map_err(|source| ScrapeError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let PrimaryExtraction { mut record, followup } =
            self.extract_primary(journal, url, &html);

        if let Some(link) = followup {
            let secondary =
                Url::parse(link.trim()).map_err(|source| ScrapeError::SecondaryLink {
                    link: link.clone(),
                    source,
                })?;
            tracing::debug!("Following full-text link {} for {}", secondary, url);
            let html = fetcher
                .fetch_page(&secondary)
                .await
                .map_err(|source| ScrapeError::Fetch {
                    url: secondary.to_string(),
                    source,
                })?;
            record.jel_codes = self.extract_jel_list(&html);
        }

        Ok(record)
    }

    /// Parse the primary article page for one journal.
    ///
    /// Synchronous on purpose: the parsed DOM never crosses an await point,
    /// which keeps the extraction futures spawnable.
    pub fn extract_primary(
        &self,
        journal: JournalTag,
        url: &Url,
        html: &str,
    ) -> PrimaryExtraction {
        let document = Html::parse_document(html);
        let body = document.select(&self.body).next();

        let abstract_raw = body
            .map(|b| self.first_text(b, &self.abstract_para))
            .unwrap_or_default();

        // Some AER articles carry no abstract at all; the paragraph at the
        // abstract position is then unrelated boilerplate that never
        // contains the "Abstract" token. Such records keep their
        // provenance but nothing else.
        if journal == JournalTag::Aer && !abstract_raw.contains("Abstract") {
            return PrimaryExtraction {
                record: Record::stamped(url.as_str(), journal),
                followup: None,
            };
        }

        let mut record = Record::stamped(url.as_str(), journal);
        record.citation = body
            .map(|b| self.citation(b))
            .unwrap_or_else(|| CITATION_SEPARATOR.to_string());

        let mut followup = None;
        match journal {
            JournalTag::Aer => match markers::split_aer_marker(&abstract_raw) {
                Some((abstract_text, codes)) => {
                    record.abstract_text = abstract_text;
                    record.jel_codes = codes;
                }
                None => {
                    // No inline marker: the codes are hyperlinked in the
                    // paragraph after the abstract instead.
                    record.abstract_text = abstract_raw;
                    record.jel_codes = body
                        .map(|b| self.codes_from_links(b))
                        .unwrap_or_default();
                }
            },
            JournalTag::Qje => {
                let (abstract_text, codes) = markers::split_qje_marker(&abstract_raw);
                record.abstract_text = abstract_text;
                record.jel_codes = codes;
            }
            JournalTag::Jpe | JournalTag::Ema => {
                record.abstract_text = abstract_raw;
            }
            JournalTag::Res => {
                record.abstract_text = abstract_raw;
                // Codes are only published on the full-text page; the link
                // text on this site is the URL itself.
                followup = Some(
                    body.map(|b| self.first_text(b, &self.res_paper_link))
                        .unwrap_or_default(),
                );
            }
        }

        PrimaryExtraction { record, followup }
    }

    /// Extract the ordered classification codes from a secondary page's
    /// JEL list.
    pub fn extract_jel_list(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        document
            .select(&self.jel_entries)
            .map(|entry| entry.text().collect::<String>().trim().to_string())
            .collect()
    }

    /// Title joined to the publication metadata paragraph.
    fn citation(&self, body: ElementRef<'_>) -> String {
        let title = self.first_text(body, &self.heading);
        let meta = self.first_text(body, &self.citation_meta);
        format!("{}{}{}", title, CITATION_SEPARATOR, meta)
    }

    /// Codes from classification hyperlinks next to the abstract.
    fn codes_from_links(&self, body: ElementRef<'_>) -> Vec<String> {
        body.select(&self.aer_code_links)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(markers::code_from_href)
            .collect()
    }

    /// Text of the first element matching `sel` under `scope`, or empty.
    fn first_text(&self, scope: ElementRef<'_>, sel: &Selector) -> String {
        scope
            .select(sel)
            .next()
            .map(|el| el.text().collect::<String>())
            .unwrap_or_default()
    }
}

fn selector(input: &str) -> Result<Selector, ExtractError> {
    Selector::parse(input).map_err(|e| ExtractError::Selector(format!("{}: {}", input, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// An article page with the citation, abstract, code-link, and
    /// full-text paragraphs at their expected child positions.
    fn article_page(abstract_text: &str, code_links: &str, paper_link: &str) -> String {
        format!(
            "<html><body><div class=\"bodytext\">\
             <h1>Economic Fluctuations</h1>\
             <p>by A. Economist</p>\
             <p>filler</p>\
             <p>filler</p>\
             <p>Journal of Examples, 2016, vol. 1</p>\
             <p>{}</p>\
             <p>{}</p>\
             <p>{}</p>\
             </div></body></html>",
            abstract_text, code_links, paper_link
        )
    }

    fn extractor() -> RecordExtractor {
        RecordExtractor::new().unwrap()
    }

    fn url() -> Url {
        Url::parse("https://example.com/article/x.htm").unwrap()
    }

    #[test]
    fn citation_is_shared_across_variants() {
        let html = article_page("Abstract: plain text.", "", "");
        for journal in [JournalTag::Qje, JournalTag::Jpe, JournalTag::Ema, JournalTag::Res] {
            let out = extractor().extract_primary(journal, &url(), &html);
            assert_eq!(
                out.record.citation,
                "Economic Fluctuations. Journal of Examples, 2016, vol. 1",
                "citation mismatch for {}",
                journal
            );
        }
    }

    #[test]
    fn aer_inline_marker() {
        let html = article_page("Abstract: Stuff (JEL D91, E12).", "", "");
        let out = extractor().extract_primary(JournalTag::Aer, &url(), &html);
        assert_eq!(out.record.abstract_text, "Abstract: Stuff");
        assert_eq!(out.record.jel_codes, vec!["D91", "E12"]);
        assert_eq!(out.record.journal, JournalTag::Aer);
        assert_eq!(out.record.url, url().as_str());
        assert!(out.followup.is_none());
    }

    #[test]
    fn aer_falls_back_to_code_hyperlinks() {
        let html = article_page(
            "Abstract: No inline codes here.",
            "<a href=\"/jel/D91\">D91</a><a href=\"/jel/E12\">E12</a>\
             <a href=\"/other/link\">ignored</a>",
            "",
        );
        let out = extractor().extract_primary(JournalTag::Aer, &url(), &html);
        assert_eq!(out.record.abstract_text, "Abstract: No inline codes here.");
        assert_eq!(out.record.jel_codes, vec!["D91", "E12"]);
    }

    #[test]
    fn aer_without_abstract_token_keeps_only_provenance() {
        let html = article_page("Volume information, no summary.", "", "");
        let out = extractor().extract_primary(JournalTag::Aer, &url(), &html);
        // Provenance is stamped even on the no-abstract path.
        assert_eq!(out.record.url, url().as_str());
        assert_eq!(out.record.journal, JournalTag::Aer);
        assert!(out.record.abstract_text.is_empty());
        assert!(out.record.jel_codes.is_empty());
        assert!(out.record.citation.is_empty());
        assert!(out.followup.is_none());
    }

    #[test]
    fn qje_marker_split() {
        let html = article_page("Lorem ipsum. JEL Codes: E12, D91.", "", "");
        let out = extractor().extract_primary(JournalTag::Qje, &url(), &html);
        assert_eq!(out.record.abstract_text, "Lorem ipsum. ");
        assert_eq!(out.record.jel_codes, vec!["E12", "D91"]);
    }

    #[test]
    fn jpe_and_ema_take_abstract_verbatim() {
        let html = article_page("Verbatim text. JEL Codes: E12.", "", "");
        for journal in [JournalTag::Jpe, JournalTag::Ema] {
            let out = extractor().extract_primary(journal, &url(), &html);
            // These journals get no marker handling at all.
            assert_eq!(out.record.abstract_text, "Verbatim text. JEL Codes: E12.");
            assert!(out.record.jel_codes.is_empty());
            assert!(out.followup.is_none());
        }
    }

    #[test]
    fn res_captures_followup_link() {
        let html = article_page(
            "Plain abstract.",
            "",
            "<a href=\"#\">http://journals.example.com/paper/42</a>",
        );
        let out = extractor().extract_primary(JournalTag::Res, &url(), &html);
        assert_eq!(out.record.abstract_text, "Plain abstract.");
        assert!(out.record.jel_codes.is_empty());
        assert_eq!(
            out.followup.as_deref(),
            Some("http://journals.example.com/paper/42")
        );
    }

    #[test]
    fn res_followup_is_empty_when_link_missing() {
        let html = article_page("Plain abstract.", "", "no anchor here");
        let out = extractor().extract_primary(JournalTag::Res, &url(), &html);
        assert_eq!(out.followup.as_deref(), Some(""));
    }

    #[test]
    fn jel_list_preserves_order() {
        let html = "<html><body><ul class=\"jel\">\
                    <li><span><a href=\"#\">C73 - Stochastic Games</a></span></li>\
                    <li><span><a href=\"#\">D82 - Asymmetric Information</a></span></li>\
                    <li><span><a href=\"#\">E12 - Keynes</a></span></li>\
                    </ul></body></html>";
        let codes = extractor().extract_jel_list(html);
        assert_eq!(
            codes,
            vec![
                "C73 - Stochastic Games",
                "D82 - Asymmetric Information",
                "E12 - Keynes"
            ]
        );
    }

    #[test]
    fn jel_list_empty_page_yields_no_codes() {
        let codes = extractor().extract_jel_list("<html><body></body></html>");
        assert!(codes.is_empty());
    }

    #[test]
    fn missing_body_container_yields_empty_fields() {
        let html = "<html><body><p>nothing structured</p></body></html>";
        let out = extractor().extract_primary(JournalTag::Jpe, &url(), html);
        assert!(out.record.abstract_text.is_empty());
        assert!(out.record.jel_codes.is_empty());
        assert_eq!(out.record.url, url().as_str());
    }
}
