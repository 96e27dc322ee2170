use pixel_debate_shared::analysis::{parse_report, ReportBlock};
use web_sys::{Document, HtmlElement};

/// Fills the analysis modal. Text goes in through `textContent`, never as
/// markup.
pub fn render_report(document: &Document, container: &HtmlElement, text: &str) {
    container.set_inner_html("");
    for block in parse_report(text) {
        let element = match &block {
            ReportBlock::Break => document.create_element("br"),
            ReportBlock::Heading(_) | ReportBlock::Paragraph(_) => document.create_element("p"),
        };
        let Ok(element) = element else {
            continue;
        };
        match block {
            ReportBlock::Heading(line) => {
                let _ = element.set_attribute("class", "report-heading");
                element.set_text_content(Some(&line));
            }
            ReportBlock::Paragraph(line) => {
                let _ = element.set_attribute("class", "report-line");
                element.set_text_content(Some(&line));
            }
            ReportBlock::Break => {}
        }
        let _ = container.append_child(&element);
    }
}
