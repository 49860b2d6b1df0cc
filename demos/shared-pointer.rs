use anyhow::{bail, Result};
use log::info;
use unique_id_registry::shared::BasicShared;

fn main() -> Result<()> {
    env_logger::init();

    // a and b point to one allocation; the count is a plain integer.
    let a = BasicShared::new([1, 2, 3]);
    let b = a.clone();
    info!("shared = {}, count = {}", BasicShared::ptr_eq(&a, &b), BasicShared::ref_count(&a));

    drop(b);
    match BasicShared::try_unwrap(a) {
        Ok(value) => info!("sole owner again, took {:?}", value),
        Err(_) => bail!("pointer should have been unique"),
    }

    // Not Send: moving a BasicShared into thread::spawn does not compile.
    Ok(())
}
