use konan::domain::KonanError;

/// Prints a failed command as plain text plus, when known, the next step.
pub fn render(err: &anyhow::Error) {
    let konan_err = err.downcast_ref::<KonanError>();

    if let Some(KonanError::Cancelled) = konan_err {
        let _ = cliclack::outro_cancel("Cancelled");
        return;
    }

    let message = err.to_string();
    eprintln!("\n{} {}", console::style("Error:").red().bold(), message);
    for cause in err.chain().skip(1) {
        let cause = cause.to_string();
        if !message.contains(&cause) {
            eprintln!("{} {}", console::style("  caused by:").dim(), cause);
        }
    }
    if let Some(help) = konan_err.and_then(KonanError::suggestion) {
        eprintln!("{} {}", console::style("  help:").dim(), help);
    }
}
