//! Terminal rendering shared by the subcommands.

use leadflow_notify::DispatchReport;

/// One line per channel, in registry order.
pub fn print_report(report: &DispatchReport) {
    println!("{} → {}/{} delivered", report.event(), report.delivered_count(), report.len());
    for entry in report {
        println!("  {:<12} {:<19} {}", entry.channel, entry.kind.as_str(), entry.outcome);
    }
}

/// Scheme and host of a URL, hiding paths that carry webhook secrets.
pub fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(url) => format!("{}://{}/…", url.scheme(), url.host_str().unwrap_or("?")),
        Err(_) => "<invalid URL>".to_owned(),
    }
}
