// Released under MIT License.

mod application;

fn main() {
    std::process::exit(if application::run() { 0 } else { 1 });
}
