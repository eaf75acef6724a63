use anyhow::{Error, Result};

/// Captures validation and out-of-memory errors raised by device calls
/// made while it is open.
///
/// Without an open scope wgpu routes such errors to its uncaptured-error
/// handler, which panics.
pub(crate) struct ErrorScope {
    // Popped in reverse push order; field order keeps the same order on drop.
    validation: wgpu::ErrorScopeGuard,
    out_of_memory: wgpu::ErrorScopeGuard,
}

impl ErrorScope {
    pub fn open(device: &wgpu::Device) -> Self {
        let out_of_memory = device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let validation = device.push_error_scope(wgpu::ErrorFilter::Validation);
        Self {
            validation,
            out_of_memory,
        }
    }

    /// Pops both scopes, blocking until the device reports what they caught.
    pub fn close(self) -> Option<wgpu::Error> {
        let Self {
            validation,
            out_of_memory,
        } = self;
        let validation = pollster::block_on(validation.pop());
        let out_of_memory = pollster::block_on(out_of_memory.pop());
        validation.or(out_of_memory)
    }
}

/// Turns what a scope caught into an error naming the failed operation.
pub(crate) fn captured(what: &str, err: Option<wgpu::Error>) -> Result<()> {
    match err {
        Some(err) => Err(Error::new(err).context(format!("device error during {what}"))),
        None => Ok(()),
    }
}
