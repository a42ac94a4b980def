fn main() -> anyhow::Result<()> {
    vibes_lib::run()
}
