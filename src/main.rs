fn main() -> anyhow::Result<()> {
    sp_timeline::run()
}
