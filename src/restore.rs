//! Boot-time restore of stored pins
//!
//! After a restart the front end has to show every pin again. The store
//! never does this on its own; whoever owns the store calls
//! [`restore_pins`] with something that knows how to present a pin.

use crate::pin::Pin;
use crate::storage::PinStore;
use crate::Result;

/// Receives each stored pin during a restore
pub trait Presenter {
    fn present(&mut self, pin: &Pin) -> Result<()>;
}

impl<F> Presenter for F
where
    F: FnMut(&Pin) -> Result<()>,
{
    fn present(&mut self, pin: &Pin) -> Result<()> {
        self(pin)
    }
}

/// Hand every stored pin to `presenter` in identity order.
///
/// Returns how many pins were presented. Stops at the first presenter error.
pub fn restore_pins<P: Presenter + ?Sized>(store: &PinStore, presenter: &mut P) -> Result<usize> {
    let pins = store.all_pins()?;
    tracing::info!("Restoring {} pins", pins.len());

    for pin in pins.values() {
        presenter.present(pin)?;
    }
    Ok(pins.len())
}
