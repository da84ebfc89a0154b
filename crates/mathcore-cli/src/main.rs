/// Default wall-clock budget for verify_equal, in milliseconds.
const VERIFY_TIMEOUT_MS: f64 = 1000.0;

fn print_usage() {
    eprintln!("usage:");
    eprintln!("  mathcore integrate <expr> <var>");
    eprintln!("  mathcore diff <expr> <var>");
    eprintln!("  mathcore solve_equation <lhs> <rhs> <var>");
    eprintln!("  mathcore verify_equal <lhs> <rhs>");
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_usage();
        std::process::exit(1);
    };

    let result = match (command.as_str(), &args[1..]) {
        ("integrate", [expr, var]) => mathcore_lang::integrate(expr, var),
        ("diff", [expr, var]) => mathcore_lang::diff(expr, var),
        ("solve_equation", [lhs, rhs, var]) => mathcore_lang::solve_equation(lhs, rhs, var),
        ("verify_equal", [lhs, rhs]) => {
            mathcore_lang::verify_equal(lhs, rhs, VERIFY_TIMEOUT_MS).map(|b| b.to_string())
        }
        _ => {
            print_usage();
            std::process::exit(1);
        }
    };

    match result {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
