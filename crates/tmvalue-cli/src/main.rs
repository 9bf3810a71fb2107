mod command;
mod data;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
