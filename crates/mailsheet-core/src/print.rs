//! Printable HTML rendering of a handout.
//!
//! The document is standalone: it carries its own stylesheet and needs
//! nothing from the application to render. Printing happens by handing the
//! file to the system viewer, which opens the print dialog after a settle
//! delay.

use std::io;
use std::path::Path;
use std::time::Duration;

use quick_xml::escape::escape;

use crate::document::{
    AccountSection, Footer, Header, IssuedDate, ManualLink, PortSection, SectionVisitor, Sections,
    ServerInfo, text,
};

const STYLESHEET: &str = r"
  @page { size: A4; margin: 0; }
  * { box-sizing: border-box; }
  body { background: white; margin: 0; padding: 0; font-family: sans-serif; color: #111827; }
  #print-wrapper { padding: 10mm; width: 210mm; margin: 0 auto; }
  .doc-header { display: flex; justify-content: space-between; align-items: flex-start;
    border-bottom: 2px solid #2563eb; padding-bottom: 8px; margin-bottom: 16px; }
  .doc-header h1 { font-size: 18px; font-weight: bold; color: #1e3a8a; margin: 0 0 2px 0; }
  .doc-header .subtitle { font-size: 9px; color: #6b7280; font-style: italic; text-transform: uppercase; margin: 0; }
  .doc-header .issued { font-size: 12px; font-weight: bold; text-align: right; }
  .greeting { font-size: 14px; line-height: 1.25; color: #374151; font-weight: bold; margin: 0 0 16px 0; }
  .block { margin-bottom: 20px; }
  .pdf-header-bar { background-color: #1e3a8a; color: white; padding: 4px 12px; display: block;
    width: fit-content; font-weight: bold; font-size: 11px; margin: 0 auto 6px auto; border-radius: 2px;
    -webkit-print-color-adjust: exact; print-color-adjust: exact; }
  table { border-collapse: collapse; }
  .server-table { width: 75%; margin: 0 auto 4px auto; border: 1px solid #d1d5db; font-size: 14px; }
  .server-table th { width: 33%; border: 1px solid #d1d5db; background: #f9fafb; padding: 8px 16px;
    text-align: left; font-weight: bold; color: #374151; }
  .server-table td { border: 1px solid #d1d5db; padding: 8px 16px; font-family: monospace;
    font-weight: bold; color: #1e40af; font-size: 16px; }
  .check-table { width: 100%; margin-top: 20px; border: 1px solid #d1d5db; }
  .check-table th, .check-table td { border: 1px solid #d1d5db; padding: 8px 12px; text-align: center;
    line-height: 1.4; font-size: 13px; }
  .check-table thead th { background-color: #475569; color: white; font-weight: bold;
    -webkit-print-color-adjust: exact; print-color-adjust: exact; }
  .check-table td.group { background: #f9fafb; color: #1f2937; font-weight: bold; }
  .check-table td.protocol { text-align: left; }
  .check-table td.port { font-family: monospace; }
  .check-table tr.selected td { font-weight: bold; color: #000000; }
  .check-table tr.muted td { color: #d1d5db; }
  .check-table tr td.group { color: #1f2937; }
  .marker-cell { display: inline-flex; width: 20px; justify-content: center; align-items: center;
    vertical-align: middle; line-height: 1; }
  tr.selected .marker-cell { color: #2563eb; }
  .legend { font-size: 9px; color: #9ca3af; margin: 4px 0 0 0; font-weight: bold; }
  .account-table { width: 100%; border: 1px solid #d1d5db; font-size: 14px; }
  .account-table th { border: 1px solid #d1d5db; background: #f9fafb; padding: 8px 16px; text-align: left;
    font-weight: bold; color: #374151; }
  .account-table th:last-child { width: 40%; }
  .account-table td { border: 1px solid #d1d5db; padding: 8px 16px; font-family: monospace;
    font-weight: bold; color: #1e40af; word-break: break-all; }
  .manual { background: #f9fafb; padding: 10px; border-radius: 8px; border: 1px solid #e5e7eb; margin-bottom: 12px; }
  .manual-label { font-size: 9px; font-weight: bold; color: #6b7280; margin-bottom: 4px;
    text-transform: uppercase; letter-spacing: 0.05em; }
  .manual-url { background: white; padding: 6px; border: 1px solid #d1d5db; font-size: 12px;
    font-family: monospace; color: #1d4ed8; border-radius: 4px; word-break: break-all; }
  .notes { font-size: 8px; color: #9ca3af; font-weight: bold; line-height: 1.25; }
  .notes p { margin: 2px 0; }
";

/// Renders a [`Sections`] tree as a standalone HTML document.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintRenderer;

impl PrintRenderer {
    /// Renders the full document, stylesheet included.
    #[must_use]
    pub fn render(sections: &Sections, issued: IssuedDate) -> String {
        let mut body = HtmlBody {
            issued,
            out: String::with_capacity(8 * 1024),
        };
        sections.accept(&mut body);

        format!(
            "<!DOCTYPE html>\n<html lang=\"ja\">\n<head>\n<meta charset=\"UTF-8\">\n\
             <title>{title}</title>\n<style>{STYLESHEET}</style>\n</head>\n<body>\n\
             <div id=\"print-wrapper\">\n{body}</div>\n</body>\n</html>\n",
            title = text::PRINT_TITLE,
            body = body.out,
        )
    }
}

/// Adds a script that opens the print dialog once the page has settled.
#[must_use]
pub fn with_auto_print(markup: &str, settle_delay: Duration) -> String {
    let script = format!(
        "<script>\nwindow.onload = function() {{\n  setTimeout(function() {{ window.print(); }}, {});\n}};\n</script>\n",
        settle_delay.as_millis()
    );
    markup.rfind("</body>").map_or_else(
        || format!("{markup}{script}"),
        |at| format!("{}{script}{}", &markup[..at], &markup[at..]),
    )
}

struct HtmlBody {
    issued: IssuedDate,
    out: String,
}

impl HtmlBody {
    fn line(&mut self, html: &str) {
        self.out.push_str(html);
        self.out.push('\n');
    }
}

impl SectionVisitor for HtmlBody {
    fn header(&mut self, header: &Header) {
        let html = format!(
            "<div class=\"doc-header\"><div><h1>{}</h1><p class=\"subtitle\">{}</p></div>\
             <div class=\"issued\">{}: {}</div></div>",
            escape(header.title),
            escape(header.subtitle),
            text::ISSUED_LABEL,
            self.issued.display(),
        );
        self.line(&html);
        let html = format!(
            "<p class=\"greeting\">{}<br>{}</p>",
            escape(header.greeting[0]),
            escape(header.greeting[1])
        );
        self.line(&html);
    }

    fn server_info(&mut self, info: &ServerInfo) {
        self.line("<section class=\"block\">");
        let html = format!("<div class=\"pdf-header-bar\">{}</div>", escape(info.heading));
        self.line(&html);
        self.line("<table class=\"server-table\"><tbody>");
        for row in &info.rows {
            let html = format!(
                "<tr><th>{}</th><td>{}</td></tr>",
                escape(row.label),
                escape(&row.value)
            );
            self.line(&html);
        }
        self.line("</tbody></table>");
    }

    fn ports(&mut self, ports: &PortSection) {
        self.line("<table class=\"check-table\"><thead><tr>");
        for column in ports.columns {
            let html = format!("<th>{}</th>", escape(column));
            self.line(&html);
        }
        self.line("</tr></thead><tbody>");
        for row in &ports.rows {
            let class = if row.selected { "selected" } else { "muted" };
            let mut html = format!("<tr class=\"{class}\">");
            if let Some(group) = row.group {
                html.push_str(&format!(
                    "<td class=\"group\" rowspan=\"{}\">{}</td>",
                    group.rowspan,
                    escape(group.label)
                ));
            }
            html.push_str(&format!(
                "<td class=\"protocol\"><span class=\"marker-cell\">{}</span> {}</td>\
                 <td class=\"port\">{}</td><td>{}</td></tr>",
                row.marker(),
                escape(row.protocol),
                escape(row.port),
                escape(row.encryption),
            ));
            self.line(&html);
        }
        self.line("</tbody></table>");
        let html = format!("<p class=\"legend\">{}</p>", escape(ports.legend));
        self.line(&html);
        self.line("</section>");
    }

    fn accounts(&mut self, accounts: &AccountSection) {
        self.line("<section class=\"block\">");
        let html = format!(
            "<div class=\"pdf-header-bar\">{}</div>",
            escape(accounts.heading)
        );
        self.line(&html);
        let html = format!(
            "<table class=\"account-table\"><thead><tr><th>{}</th><th>{}</th></tr></thead><tbody>",
            escape(accounts.columns[0]),
            escape(accounts.columns[1])
        );
        self.line(&html);
        for row in &accounts.rows {
            let html = format!(
                "<tr><td>{}</td><td>{}</td></tr>",
                escape(&row.email),
                escape(&row.password)
            );
            self.line(&html);
        }
        self.line("</tbody></table>");
        self.line("</section>");
    }

    fn manual_link(&mut self, link: &ManualLink) {
        let html = format!(
            "<div class=\"manual\"><div class=\"manual-label\">{}</div>\
             <div class=\"manual-url\">{}</div></div>",
            escape(link.label),
            escape(&link.url)
        );
        self.line(&html);
    }

    fn footer(&mut self, footer: &Footer) {
        self.line("<div class=\"notes\">");
        for note in footer.notes {
            let html = format!("<p>{}</p>", escape(note));
            self.line(&html);
        }
        self.line("</div>");
    }
}

/// Hands a rendered print document to something that can show and print it.
pub trait PrintLauncher: Send + Sync {
    /// Opens the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if no viewer could be started.
    fn open(&self, path: &Path) -> io::Result<()>;
}

/// Opens print documents with the system's default handler for HTML files.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenerLauncher;

impl PrintLauncher for OpenerLauncher {
    fn open(&self, path: &Path) -> io::Result<()> {
        opener::open(path).map_err(|e| io::Error::other(e.to_string()))
    }
}
