// SPDX-License-Identifier: GPL-3.0-only

//! DiskArbitration session and the native approval trampoline

use std::ffi::c_void;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::ptr;
use std::sync::Arc;

use core_foundation::base::{CFType, TCFType, kCFAllocatorDefault};
use core_foundation::runloop::{CFRunLoop, kCFRunLoopDefaultMode};
use core_foundation::url::CFURL;
use diskblock_contracts::{
    ArbitrationBackend, ArbitrationError, ArbitrationSession, DiskHandle, MountPolicy, Result,
};
use diskblock_types::Decision;

use crate::disk::DaDisk;
use crate::dissenter;
use crate::ffi::disk_arbitration::{
    DADiskCreateFromVolumePath, DADiskMountApprovalCallback, DADiskRef, DADiskUnmount,
    DADissenterRef, DARegisterDiskMountApprovalCallback, DASessionCreate, DASessionRef,
    DASessionScheduleWithRunLoop, DASessionUnscheduleFromRunLoop, DAUnregisterApprovalCallback,
    kDADiskUnmountOptionDefault,
};
use crate::volumes;

type PolicyContext = Arc<dyn MountPolicy>;

extern "C" fn approval_trampoline(disk: DADiskRef, context: *mut c_void) -> DADissenterRef {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        // The context outlives the registration; see `DaSession::unregister`.
        let policy = unsafe { &*(context as *const PolicyContext) };
        let disk = unsafe { DaDisk::from_get_rule(disk) }?;
        Some(policy.decide(&disk))
    }));

    match outcome {
        Ok(Some(Decision::Allow)) => ptr::null(),
        Ok(Some(Decision::Deny { reason })) => dissenter::create(&reason),
        Ok(None) => {
            tracing::error!("approval requested for a null disk, allowing");
            ptr::null()
        }
        Err(_) => {
            tracing::error!("mount policy panicked, allowing");
            ptr::null()
        }
    }
}

extern "C" fn unmount_completed(
    disk: DADiskRef,
    dissenter: DADissenterRef,
    _context: *mut c_void,
) {
    let name = unsafe { DaDisk::from_get_rule(disk) }
        .and_then(|disk| disk.bsd_name())
        .unwrap_or_else(|| "unknown disk".to_string());

    if dissenter.is_null() {
        tracing::info!("unmounted {name}");
        return;
    }

    let (status, message) = unsafe { dissenter::describe(dissenter) };
    tracing::error!(
        "unmount of {name} refused (status {status:#x}): {}",
        message.as_deref().unwrap_or("no reason given")
    );
}

/// Creates DiskArbitration sessions with the default allocator.
#[derive(Debug, Default, Clone, Copy)]
pub struct DaBackend;

impl ArbitrationBackend for DaBackend {
    type Session = DaSession;

    fn create_session(&self) -> Result<DaSession> {
        let ptr = unsafe { DASessionCreate(kCFAllocatorDefault) };
        if ptr.is_null() {
            return Err(ArbitrationError::SessionUnavailable(
                "DASessionCreate returned null".to_string(),
            ));
        }

        Ok(DaSession {
            session: unsafe { CFType::wrap_under_create_rule(ptr as _) },
            approval: None,
            run_loop: None,
        })
    }
}

pub struct DaSession {
    session: CFType,
    /// Boxed policy handed to the framework as callback context.
    approval: Option<*mut PolicyContext>,
    run_loop: Option<CFRunLoop>,
}

impl DaSession {
    fn as_ptr(&self) -> DASessionRef {
        self.session.as_CFTypeRef() as DASessionRef
    }

    fn unregister(&mut self) {
        let Some(context) = self.approval.take() else {
            return;
        };

        let callback: DADiskMountApprovalCallback = approval_trampoline;
        unsafe {
            DAUnregisterApprovalCallback(self.as_ptr(), callback as *mut c_void, context.cast());
            drop(Box::from_raw(context));
        }
    }
}

impl ArbitrationSession for DaSession {
    type Disk = DaDisk;

    fn mounted_volumes(&self) -> Option<Vec<PathBuf>> {
        volumes::mounted_volume_paths()
    }

    fn disk_for_volume(&self, volume: &Path) -> Option<DaDisk> {
        let Some(url) = CFURL::from_path(volume, true) else {
            tracing::debug!("cannot express {} as a URL", volume.display());
            return None;
        };

        unsafe {
            DaDisk::from_create_rule(DADiskCreateFromVolumePath(
                kCFAllocatorDefault,
                self.as_ptr(),
                url.as_concrete_TypeRef(),
            ))
        }
    }

    fn request_unmount(&self, disk: &DaDisk) {
        tracing::info!(
            "requesting unmount of {}",
            disk.description()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "unknown disk".to_string())
        );

        unsafe {
            DADiskUnmount(
                disk.as_ptr(),
                kDADiskUnmountOptionDefault,
                Some(unmount_completed),
                ptr::null_mut(),
            );
        }
    }

    fn register_approval(&mut self, policy: Arc<dyn MountPolicy>) {
        self.unregister();

        let context = Box::into_raw(Box::new(policy));
        unsafe {
            // A null match dictionary matches every disk.
            DARegisterDiskMountApprovalCallback(
                self.as_ptr(),
                ptr::null(),
                approval_trampoline,
                context.cast(),
            );
        }
        self.approval = Some(context);
    }

    fn schedule(&mut self) {
        if self.run_loop.is_some() {
            return;
        }

        let run_loop = CFRunLoop::get_current();
        unsafe {
            DASessionScheduleWithRunLoop(
                self.as_ptr(),
                run_loop.as_concrete_TypeRef(),
                kCFRunLoopDefaultMode,
            );
        }
        self.run_loop = Some(run_loop);
    }
}

impl Drop for DaSession {
    fn drop(&mut self) {
        self.unregister();

        if let Some(run_loop) = self.run_loop.take() {
            unsafe {
                DASessionUnscheduleFromRunLoop(
                    self.as_ptr(),
                    run_loop.as_concrete_TypeRef(),
                    kCFRunLoopDefaultMode,
                );
            }
        }
    }
}
