extern crate zbootenv;

use std::error::Error;

use zbootenv::bootenv::BootEnv;

fn main() -> Result<(), Box<dyn Error>> {
    let mut env = BootEnv::new();
    env.set_boot_device("tank/ROOT/default")?;
    env.set_pair("grub:envmap", "kernel=/boot/kernel")?;

    print!("{env}");
    println!("serialized: {} bytes", env.as_bytes().len());

    Ok(())
}
