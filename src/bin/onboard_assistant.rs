use onboard_assistant::config::load_settings;
use onboard_assistant::session::{begin_login, parse_require_signature};

fn output_header() -> &'static str {
    "Onboard Assistant\nSession choreography for the employee onboarding chat front-end."
}

fn print_header() {
    println!("{}\n", output_header());
}

fn usage() -> String {
    "usage: onboard_assistant <command>\n\
     \n\
     commands:\n\
     \x20\x20doctor               validate settings and show the resolved state root\n\
     \x20\x20login-url [--no-signature]\n\
     \x20\x20                     mint a login state token and print the provider redirect URL"
        .to_string()
}

fn run_doctor() -> Result<String, String> {
    let settings = load_settings().map_err(|err| err.to_string())?;
    let state_root = settings
        .resolve_state_root()
        .map_err(|err| err.to_string())?;
    Ok(format!(
        "settings ok\nstate root: {}\nagent endpoint: {}\nredirect uri: {}",
        state_root.display(),
        settings.agent_endpoint,
        settings.redirect_uri
    ))
}

fn run_login_url(args: &[String]) -> Result<String, String> {
    let require_signature = parse_require_signature(if args.iter().any(|a| a == "--no-signature") {
        Some("false")
    } else {
        None
    });
    let settings = load_settings().map_err(|err| err.to_string())?;
    let state_root = settings
        .resolve_state_root()
        .map_err(|err| err.to_string())?;
    let start =
        begin_login(&settings, &state_root, require_signature).map_err(|err| err.to_string())?;
    Ok(format!(
        "state token: {}\nrequire signature: {require_signature}\n{}",
        start.state_token, start.authorization_url
    ))
}

fn run() -> Result<(), String> {
    print_header();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let output = match args.first().map(String::as_str) {
        Some("doctor") => run_doctor()?,
        Some("login-url") => run_login_url(&args[1..])?,
        _ => usage(),
    };
    println!("{output}");
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
