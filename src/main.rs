fn main() {
    #[cfg(target_arch = "wasm32")]
    {
        use nimbus_web::boot;

        // Initialize tracing for WASM
        tracing_wasm::set_as_global_default();
        console_error_panic_hook::set_once();

        tracing::info!("Starting Nimbus Web Console");

        // The mount slot is created here and handed to everything that may
        // need to replace or release the mounted app.
        let slot = boot::MountSlot::shared();

        // Failure handlers must be live before any load is attempted.
        boot::install_global_handlers(&slot);

        // Load and mount the app
        wasm_bindgen_futures::spawn_local(boot::start(slot));
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        eprintln!("❌ This binary is intended for the browser (WASM).");
        eprintln!("   Please use `trunk serve` to run the development server.");
    }
}
