use crate::chart::render_trend_chart;
use crate::dates::long_date;
use crate::models::{
    NoteDocument, SortKey, Statistics, Theme, VocabEntry, VocabularyQuery, VocabularyRecord,
};
use crate::practice::Flashcard;
use chrono::{Datelike, Local};
use maud::{DOCTYPE, Markup, PreEscaped, html};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Vocabulary,
    Stats,
    Practice,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Vocabulary, Page::Stats, Page::Practice];

    pub fn href(self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Vocabulary => "/vocabulary",
            Page::Stats => "/stats",
            Page::Practice => "/practice",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Page::Home => "Daily Notes",
            Page::Vocabulary => "Vocabulary",
            Page::Stats => "Statistics",
            Page::Practice => "Practice",
        }
    }
}

fn layout(page: Page, theme: Theme, back: &str, content: Markup) -> String {
    let page_title = format!("{} · Arabic Learning Log", page.label());
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page_title) }
                style { (PreEscaped(CSS)) }
            }
            body class=(format!("{theme}-theme")) {
                header.site-header {
                    h1 { "Arabic Learning Log" }
                    nav {
                        @for link in Page::ALL {
                            a.nav-link.active[link == page] href=(link.href()) { (link.label()) }
                        }
                    }
                    form.theme-form method="post" action="/theme/toggle" {
                        input type="hidden" name="back" value=(back);
                        button.theme-toggle type="submit" title="Toggle theme" {
                            @if theme.is_dark() { "🌞" } @else { "🌙" }
                        }
                    }
                }
                main.page { (content) }
                footer { "© " (Local::now().year()) " Arabic Learning Log" }
            }
        }
    }
    .into_string()
}

fn vocab_details(entry: &VocabEntry) -> Markup {
    html! {
        div { strong { "Arabic:" } " " span.arabic lang="ar" { (entry.arabic) } }
        div { strong { "English:" } " " (entry.english) }
        div { strong { "Urdu:" } " " (entry.urdu.as_deref().unwrap_or("N/A")) }
        @if let Some(example) = &entry.example {
            div.example {
                strong { "Example:" } " " span lang="ar" { (example.arabic) } " " em { "(" (example.english) ")" }
            }
        }
    }
}

pub fn render_feed(theme: Theme, back: &str, notes: &[NoteDocument]) -> String {
    let content = html! {
        h2 { "Daily Notes" }
        @if notes.is_empty() {
            p.empty-state { "No notes yet." }
        }
        div #notes-container {
            @for note in notes {
                details.daily-note {
                    summary.note-date { (long_date(note.date)) " - " (note.topic) }
                    div.note-content {
                        @if !note.vocabulary.is_empty() {
                            h3 { "Vocabulary" }
                            div.vocab-list {
                                @for entry in &note.vocabulary {
                                    div.vocab-item { (vocab_details(entry)) }
                                }
                            }
                        }
                        @if !note.sentences.is_empty() {
                            h3 { "Sentences" }
                            div.sentence-list {
                                @for sentence in &note.sentences {
                                    div.sentence-item {
                                        div { strong { "Arabic:" } " " span lang="ar" { (sentence.arabic) } }
                                        div { strong { "English:" } " " (sentence.english) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };
    layout(Page::Home, theme, back, content)
}

pub fn render_vocabulary(
    theme: Theme,
    back: &str,
    query: &VocabularyQuery,
    records: &[VocabularyRecord],
) -> String {
    let content = html! {
        h2 { "Vocabulary" }
        form.vocab-controls method="get" action="/vocabulary" {
            input #vocab-search type="search" name="q" placeholder="Search words..."
                value=(query.filter.as_deref().unwrap_or(""));
            select #vocab-sort name="sort" {
                @for key in SortKey::ALL {
                    option value=(key.as_str()) selected[key == query.sort] { (key.label()) }
                }
            }
            button type="submit" { "Apply" }
        }
        @if records.is_empty() {
            p.empty-state { "No vocabulary matches." }
        }
        div #vocabulary-container {
            @for record in records {
                div.vocab-card {
                    h3 lang="ar" { (record.entry.arabic) }
                    p { strong { "English:" } " " (record.entry.english) }
                    p { strong { "Urdu:" } " " (record.entry.urdu.as_deref().unwrap_or("N/A")) }
                    @if let Some(example) = &record.entry.example {
                        p.example {
                            strong { "Example:" } " " (example.arabic) " " em { "(" (example.english) ")" }
                        }
                    }
                    p.vocab-date { small { "Added on: " (long_date(record.date)) } }
                }
            }
        }
    };
    layout(Page::Vocabulary, theme, back, content)
}

pub fn render_stats(theme: Theme, back: &str, stats: &Statistics) -> String {
    let content = html! {
        h2 { "Statistics" }
        div.stat-cards {
            div.stat-card { span.stat-value #total-vocab { (stats.total_vocabulary) } span { "Words learned" } }
            div.stat-card { span.stat-value #total-sentences { (stats.total_sentences) } span { "Sentences" } }
            div.stat-card { span.stat-value #total-days { (stats.day_count) } span { "Days learning" } }
        }
        section.chart-panel {
            (render_trend_chart(&stats.series, theme))
        }
        section {
            h3 { "Most frequent words" }
            ol #word-frequency-list {
                @for word in &stats.top_frequency {
                    li {
                        strong lang="ar" { (word.arabic) } " (" (word.english) ") - "
                        em { (word.count) " " @if word.count == 1 { "time" } @else { "times" } }
                    }
                }
            }
        }
    };
    layout(Page::Stats, theme, back, content)
}

pub fn render_practice(theme: Theme, back: &str, deck: &[Flashcard], index: usize) -> String {
    let len = deck.len().max(1);
    let previous = (index + len - 1) % len;
    let next = (index + 1) % len;
    let content = html! {
        h2 { "Practice" }
        @if let Some(card) = deck.get(index) {
            section.flashcards {
                input #flip type="checkbox" hidden;
                label.flashcard-frame for="flip" {
                    div.flashcard {
                        div.flashcard-face.front { (card.front) }
                        div.flashcard-face.back lang="ar" { (card.back) }
                    }
                }
                div.flashcard-nav {
                    a.btn href=(format!("/practice?card={previous}")) { "← Previous" }
                    span { (index + 1) " / " (deck.len()) }
                    a.btn href=(format!("/practice?card={next}")) { "Next →" }
                }
            }
        }
        section.writing-practice {
            h3 { "Writing practice" }
            canvas #writing-canvas width="600" height="240" {}
            button #clear-canvas type="button" { "Clear" }
        }
        script { (PreEscaped(CANVAS_JS)) }
    };
    layout(Page::Practice, theme, back, content)
}

/// Shown when no note could be loaded at all.
pub fn render_unavailable(theme: Theme, page: Page, retry: &str) -> String {
    let content = html! {
        section.unavailable {
            h2 { "Couldn't load your learning notes" }
            p { "None of the daily notes could be retrieved right now." }
            a.btn.retry href=(retry) { "Try again" }
        }
    };
    layout(page, theme, retry, content)
}

const CANVAS_JS: &str = r#"
(function () {
  const canvas = document.getElementById('writing-canvas');
  const ctx = canvas.getContext('2d');
  let drawing = false;
  ctx.strokeStyle = getComputedStyle(document.body).getPropertyValue('--ink') || '#333';
  ctx.lineWidth = 3;
  ctx.lineCap = 'round';

  function position(e) {
    const rect = canvas.getBoundingClientRect();
    const point = e.touches ? e.touches[0] : e;
    return {
      x: (point.clientX - rect.left) * (canvas.width / rect.width),
      y: (point.clientY - rect.top) * (canvas.height / rect.height)
    };
  }
  function start(e) { drawing = true; const p = position(e); ctx.beginPath(); ctx.moveTo(p.x, p.y); e.preventDefault(); }
  function move(e) { if (!drawing) return; const p = position(e); ctx.lineTo(p.x, p.y); ctx.stroke(); e.preventDefault(); }
  function stop() { drawing = false; }

  canvas.addEventListener('mousedown', start);
  canvas.addEventListener('mousemove', move);
  canvas.addEventListener('mouseup', stop);
  canvas.addEventListener('mouseout', stop);
  canvas.addEventListener('touchstart', start);
  canvas.addEventListener('touchmove', move);
  canvas.addEventListener('touchend', stop);
  document.getElementById('clear-canvas').addEventListener('click', function () {
    ctx.clearRect(0, 0, canvas.width, canvas.height);
  });
})();
"#;

const CSS: &str = r#"
@import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Amiri&display=swap');

:root, .light-theme {
  --bg: #f6f7fb;
  --card: #ffffff;
  --ink: #2b2a28;
  --muted: #666;
  --accent: #3498db;
  --border: rgba(0, 0, 0, 0.08);
}

.dark-theme {
  --bg: #16181d;
  --card: #22252c;
  --ink: #e0e0e0;
  --muted: #a0a4ab;
  --accent: #5dade2;
  --border: rgba(255, 255, 255, 0.1);
}

.desert-theme {
  --bg: #f5e6cc;
  --card: #fff8ec;
  --ink: #5a3e1b;
  --muted: #7a5c3a;
  --accent: #c8873a;
  --border: rgba(122, 92, 58, 0.2);
}

* { box-sizing: border-box; }

body {
  margin: 0;
  min-height: 100vh;
  background: var(--bg);
  color: var(--ink);
  font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
}

[lang="ar"] { font-family: "Amiri", serif; font-size: 1.15em; direction: rtl; }

.site-header {
  display: flex;
  flex-wrap: wrap;
  align-items: center;
  gap: 18px;
  padding: 18px 28px;
  background: var(--card);
  border-bottom: 1px solid var(--border);
}

.site-header h1 { margin: 0; font-size: 1.4rem; flex: 1; }
nav { display: flex; gap: 14px; }
.nav-link { color: var(--muted); text-decoration: none; font-weight: 500; }
.nav-link.active { color: var(--accent); border-bottom: 2px solid var(--accent); }
.theme-form { margin: 0; }
.theme-toggle { background: none; border: 1px solid var(--border); border-radius: 50%; width: 38px; height: 38px; cursor: pointer; font-size: 1.1rem; }

.page { width: min(960px, 100%); margin: 0 auto; padding: 28px 18px 48px; }
.empty-state { color: var(--muted); }

.daily-note { background: var(--card); border: 1px solid var(--border); border-radius: 14px; margin-bottom: 14px; }
.note-date { padding: 16px 20px; cursor: pointer; font-weight: 600; }
.note-content { padding: 0 20px 18px; }
.vocab-list, .sentence-list { display: grid; gap: 10px; }
.vocab-item, .sentence-item { padding: 12px; border-radius: 10px; border: 1px solid var(--border); }
.example { color: var(--muted); margin-top: 6px; }

.vocab-controls { display: flex; gap: 10px; margin-bottom: 18px; }
.vocab-controls input { flex: 1; padding: 8px 12px; }
#vocabulary-container { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 14px; }
.vocab-card { background: var(--card); border: 1px solid var(--border); border-radius: 14px; padding: 16px; }
.vocab-card h3 { margin-top: 0; }
.vocab-date { color: var(--muted); }

.stat-cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 14px; }
.stat-card { background: var(--card); border: 1px solid var(--border); border-radius: 14px; padding: 18px; display: grid; gap: 4px; }
.stat-value { font-size: 2rem; font-weight: 600; color: var(--accent); }
.chart-panel { background: var(--card); border: 1px solid var(--border); border-radius: 14px; padding: 12px; margin: 18px 0; }
.trend-chart { width: 100%; height: auto; }

.flashcard-frame { display: block; perspective: 1000px; cursor: pointer; }
.flashcard { position: relative; height: 200px; transition: transform 0.5s; transform-style: preserve-3d; }
#flip:checked + .flashcard-frame .flashcard { transform: rotateY(180deg); }
.flashcard-face { position: absolute; inset: 0; display: grid; place-items: center; font-size: 2rem; border-radius: 16px; background: var(--card); border: 1px solid var(--border); backface-visibility: hidden; }
.flashcard-face.back { transform: rotateY(180deg); }
.flashcard-nav { display: flex; justify-content: space-between; align-items: center; margin-top: 14px; }
.btn { color: var(--accent); text-decoration: none; font-weight: 600; }
#writing-canvas { width: 100%; background: var(--card); border: 1px dashed var(--border); border-radius: 12px; touch-action: none; }

.unavailable { text-align: center; padding: 48px 0; }
.retry { display: inline-block; margin-top: 12px; padding: 10px 18px; border: 1px solid var(--accent); border-radius: 999px; }

footer { text-align: center; color: var(--muted); padding: 18px; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyCount, FrequencyEntry, SentenceEntry};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    #[test]
    fn feed_shows_date_topic_and_escapes_text() {
        let notes = vec![NoteDocument {
            date: day(20),
            topic: "Home <script>".to_string(),
            vocabulary: vec![VocabEntry {
                arabic: "ماء".to_string(),
                english: "Water".to_string(),
                urdu: None,
                example: None,
            }],
            sentences: vec![SentenceEntry {
                arabic: "أريد ماء".to_string(),
                english: "I want water".to_string(),
            }],
        }];
        let html = render_feed(Theme::Dark, "/", &notes);
        assert!(html.contains("July 20, 2025 - Home &lt;script&gt;"));
        assert!(html.contains("N/A"));
        assert!(html.contains("Sentences"));
        assert!(html.contains("dark-theme"));
        assert!(html.contains("🌞"));
    }

    #[test]
    fn stats_page_pluralizes_counts() {
        let stats = Statistics {
            total_vocabulary: 5,
            total_sentences: 3,
            day_count: 2,
            top_frequency: vec![
                FrequencyEntry { arabic: "ماء".to_string(), english: "Water".to_string(), count: 2 },
                FrequencyEntry { arabic: "باب".to_string(), english: "Door".to_string(), count: 1 },
            ],
            series: vec![DailyCount { date: day(20), count: 3 }],
        };
        let html = render_stats(Theme::Light, "/stats", &stats);
        assert!(html.contains("2 times"));
        assert!(html.contains("1 time<"));
        assert!(html.contains("<svg"));
    }

    #[test]
    fn vocabulary_page_keeps_selected_sort() {
        let query = VocabularyQuery {
            filter: Some("wa".to_string()),
            sort: SortKey::WordDesc,
        };
        let html = render_vocabulary(Theme::Light, "/vocabulary?q=wa&sort=word-desc", &query, &[]);
        assert!(html.contains(r#"<option value="word-desc" selected>"#));
        assert!(html.contains(r#"value="wa""#));
        assert!(html.contains("No vocabulary matches."));
        assert!(html.contains(r#"name="back" value="/vocabulary?q=wa&amp;sort=word-desc""#));
    }

    #[test]
    fn practice_links_wrap_around() {
        let deck = vec![
            Flashcard { front: "Hello".to_string(), back: "مرحبا".to_string() },
            Flashcard { front: "Water".to_string(), back: "ماء".to_string() },
        ];
        let html = render_practice(Theme::Light, "/practice?card=0", &deck, 0);
        assert!(html.contains("/practice?card=1"));
        assert!(html.contains("1 / 2"));
        assert!(html.contains("writing-canvas"));
    }
}
