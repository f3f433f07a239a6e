use paramux::cli;

fn main() {
    std::process::exit(cli::run());
}
