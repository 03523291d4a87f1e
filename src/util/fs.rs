use crate::error::StoreError;
use std::fs;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

pub fn ensure_dir(path: &Path, mode: u32) -> Result<(), StoreError> {
    if !path.exists() {
        fs::create_dir_all(path)
            .map_err(|e| StoreError::io(format!("create directory {}", path.display()), e))?;
        set_permissions(path, mode)?;
    }
    Ok(())
}

pub fn set_permissions(path: &Path, mode: u32) -> Result<(), StoreError> {
    #[cfg(unix)]
    {
        let perm = fs::Permissions::from_mode(mode);
        fs::set_permissions(path, perm).map_err(|e| {
            StoreError::io(format!("set permissions {:o} on {}", mode, path.display()), e)
        })?;
    }
    #[cfg(not(unix))]
    let _ = (path, mode);
    Ok(())
}
