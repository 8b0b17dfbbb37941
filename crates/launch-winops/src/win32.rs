//! Win32 backend: monitor enumeration, top-level window discovery, placement
//! and shell launches.

use std::{
    ffi::OsStr,
    io, iter, mem,
    os::windows::{
        ffi::OsStrExt,
        io::{AsRawHandle, FromRawHandle, OwnedHandle},
    },
    path::Path,
};

use tracing::{debug, trace, warn};
use windows::{
    Win32::{
        Foundation::{BOOL, CloseHandle, HANDLE, HWND, LPARAM, RECT, WAIT_OBJECT_0},
        Graphics::Gdi::{
            EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO, MONITORINFOEXW,
        },
        System::{
            Diagnostics::ToolHelp::{
                CreateToolhelp32Snapshot, PROCESSENTRY32W, Process32FirstW, Process32NextW,
                TH32CS_SNAPPROCESS,
            },
            Threading::{GetProcessId, WaitForSingleObject},
        },
        UI::{
            Shell::{
                SEE_MASK_FLAG_NO_UI, SEE_MASK_NOCLOSEPROCESS, SHELLEXECUTEINFOW, ShellExecuteExW,
                ShellExecuteW,
            },
            WindowsAndMessaging::{
                EnumWindows, GW_OWNER, GetWindow, GetWindowTextW, GetWindowThreadProcessId,
                IsWindow, IsWindowVisible, SW_RESTORE, SW_SHOWNORMAL, SWP_NOSIZE, SWP_NOZORDER,
                SWP_SHOWWINDOW, SetForegroundWindow, SetWindowPos, ShowWindow,
            },
        },
    },
    core::{Error as WinError, PCWSTR, w},
};

use crate::{
    Display, WindowHandle, WindowInfo,
    error::{Error, Result},
    geom::{Point, Rect},
    process::{SpawnedProcess, process_name_for},
};

/// `MONITORINFO::dwFlags` bit marking the primary monitor.
const MONITORINFOF_PRIMARY: u32 = 1;

/// Return value of `ShellExecuteW` above which the call succeeded.
const SHELL_EXECUTE_OK: isize = 32;

/// NUL-terminated UTF-16 copy of an OS string.
fn wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(iter::once(0)).collect()
}

#[inline]
fn hwnd(handle: WindowHandle) -> HWND {
    HWND(handle.0 as _)
}

#[inline]
fn handle_of(hwnd: HWND) -> WindowHandle {
    WindowHandle(hwnd.0 as isize)
}

/// Parse the trailing number of a GDI device name (`\\.\DISPLAY2` -> 2).
fn device_number(device: &[u16]) -> Option<i64> {
    let name = String::from_utf16_lossy(device);
    let name = name.trim_end_matches('\0');
    let digits: String = name
        .chars()
        .rev()
        .take_while(char::is_ascii_digit)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().ok()
}

unsafe extern "system" fn monitor_callback(
    monitor: HMONITOR,
    _hdc: HDC,
    _clip: *mut RECT,
    data: LPARAM,
) -> BOOL {
    // SAFETY: `data` is the `&mut Vec<Display>` passed by `displays` for the
    // duration of the synchronous enumeration.
    let out = unsafe { &mut *(data.0 as *mut Vec<Display>) };
    let mut info = MONITORINFOEXW::default();
    info.monitorInfo.cbSize = mem::size_of::<MONITORINFOEXW>() as u32;
    let ok = unsafe {
        GetMonitorInfoW(monitor, &mut info as *mut MONITORINFOEXW as *mut MONITORINFO)
    };
    if ok.as_bool() {
        let rc = info.monitorInfo.rcMonitor;
        let fallback_id = out.len() as i64 + 1;
        out.push(Display {
            id: device_number(&info.szDevice).unwrap_or(fallback_id),
            bounds: Rect::from_edges(rc.left, rc.top, rc.right, rc.bottom),
            primary: info.monitorInfo.dwFlags & MONITORINFOF_PRIMARY != 0,
        });
    } else {
        warn!("GetMonitorInfoW failed; skipping monitor");
    }
    true.into()
}

/// Enumerate attached monitors in OS order.
pub fn displays() -> Result<Vec<Display>> {
    let mut out: Vec<Display> = Vec::new();
    let ok = unsafe {
        EnumDisplayMonitors(
            HDC::default(),
            None,
            Some(monitor_callback),
            LPARAM(&mut out as *mut Vec<Display> as isize),
        )
    };
    if !ok.as_bool() {
        return Err(Error::os("EnumDisplayMonitors", WinError::from_win32()));
    }
    trace!(count = out.len(), "enumerated displays");
    Ok(out)
}

/// A visible top-level window without an owner.
fn is_main_window(hwnd: HWND) -> bool {
    unsafe {
        IsWindowVisible(hwnd).as_bool()
            && GetWindow(hwnd, GW_OWNER).map_or(true, |owner| owner.0.is_null())
    }
}

unsafe extern "system" fn window_callback(hwnd: HWND, data: LPARAM) -> BOOL {
    // SAFETY: `data` is the `&mut Vec<(HWND, u32)>` owned by `main_windows`.
    let out = unsafe { &mut *(data.0 as *mut Vec<(HWND, u32)>) };
    if is_main_window(hwnd) {
        let mut pid = 0u32;
        unsafe { GetWindowThreadProcessId(hwnd, Some(&mut pid)) };
        if pid != 0 {
            out.push((hwnd, pid));
        }
    }
    true.into()
}

/// All main-window candidates in z-order (topmost first).
fn main_windows() -> Vec<(HWND, u32)> {
    let mut out: Vec<(HWND, u32)> = Vec::new();
    if let Err(err) = unsafe {
        EnumWindows(
            Some(window_callback),
            LPARAM(&mut out as *mut Vec<(HWND, u32)> as isize),
        )
    } {
        debug!(%err, "EnumWindows stopped early");
    }
    out
}

fn window_title(hwnd: HWND) -> String {
    let mut buf = [0u16; 256];
    let len = unsafe { GetWindowTextW(hwnd, &mut buf) };
    String::from_utf16_lossy(&buf[..len.max(0) as usize])
}

fn window_info(hwnd: HWND, pid: u32) -> WindowInfo {
    WindowInfo {
        handle: handle_of(hwnd),
        pid,
        title: window_title(hwnd),
    }
}

/// Process snapshot as `(pid, exe base name)` in Toolhelp order.
fn process_names() -> Result<Vec<(u32, String)>> {
    let mut out = Vec::new();
    unsafe {
        let snapshot = CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0)
            .map_err(|e| Error::os("CreateToolhelp32Snapshot", e))?;
        let mut entry = PROCESSENTRY32W {
            dwSize: mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };
        if Process32FirstW(snapshot, &mut entry).is_ok() {
            loop {
                let exe: Vec<u16> = entry
                    .szExeFile
                    .iter()
                    .take_while(|&&c| c != 0)
                    .copied()
                    .collect();
                let exe = String::from_utf16_lossy(&exe);
                out.push((entry.th32ProcessID, process_name_for(Path::new(&exe))));
                if Process32NextW(snapshot, &mut entry).is_err() {
                    break;
                }
            }
        }
        if let Err(err) = CloseHandle(snapshot) {
            trace!(%err, "CloseHandle(snapshot) failed");
        }
    }
    Ok(out)
}

/// Main window of `pid`, if it currently exposes one.
pub fn main_window_for_pid(pid: u32) -> Option<WindowInfo> {
    main_windows()
        .into_iter()
        .find(|(_, p)| *p == pid)
        .map(|(h, p)| window_info(h, p))
}

/// Main windows of every process whose executable base name matches `name`
/// (case-insensitive), one per process, in process enumeration order.
pub fn main_windows_named(name: &str) -> Vec<WindowInfo> {
    let procs = match process_names() {
        Ok(procs) => procs,
        Err(err) => {
            debug!(%err, "process snapshot failed");
            return Vec::new();
        }
    };
    let windows = main_windows();
    procs
        .into_iter()
        .filter(|(_, exe)| exe.eq_ignore_ascii_case(name))
        .filter_map(|(pid, _)| {
            windows
                .iter()
                .find(|(_, p)| *p == pid)
                .map(|&(h, p)| window_info(h, p))
        })
        .collect()
}

/// Move a window's top-left corner to `origin`, keeping its size and z-order.
pub fn move_window(handle: WindowHandle, origin: Point) -> Result<()> {
    let hwnd = hwnd(handle);
    unsafe {
        if !IsWindow(hwnd).as_bool() {
            return Err(Error::WindowGone);
        }
        SetWindowPos(
            hwnd,
            HWND::default(),
            origin.x,
            origin.y,
            0,
            0,
            SWP_NOSIZE | SWP_NOZORDER | SWP_SHOWWINDOW,
        )
        .map_err(|e| Error::os("SetWindowPos", e))
    }
}

/// Restore a minimized window and bring it to the foreground.
pub fn activate_window(handle: WindowHandle) -> Result<()> {
    let hwnd = hwnd(handle);
    unsafe {
        if !IsWindow(hwnd).as_bool() {
            return Err(Error::WindowGone);
        }
        let was_visible = ShowWindow(hwnd, SW_RESTORE).as_bool();
        trace!(window = %handle, was_visible, "ShowWindow(SW_RESTORE)");
        if !SetForegroundWindow(hwnd).as_bool() {
            return Err(Error::os(
                "SetForegroundWindow",
                "foreground change refused",
            ));
        }
    }
    Ok(())
}

/// Launch through `ShellExecuteExW`, keeping the process handle.
pub fn shell_execute_tracked(path: &Path) -> Result<SpawnedProcess> {
    let file = wide(path.as_os_str());
    let mut info = SHELLEXECUTEINFOW {
        cbSize: mem::size_of::<SHELLEXECUTEINFOW>() as u32,
        fMask: SEE_MASK_NOCLOSEPROCESS | SEE_MASK_FLAG_NO_UI,
        lpVerb: w!("open"),
        lpFile: PCWSTR(file.as_ptr()),
        nShow: SW_SHOWNORMAL.0,
        ..Default::default()
    };
    unsafe { ShellExecuteExW(&mut info) }.map_err(|e| Error::Spawn {
        path: path.to_path_buf(),
        source: io::Error::other(e),
    })?;
    if info.hProcess.is_invalid() {
        // The shell handed the request to an already running instance.
        debug!(path = %path.display(), "shell launch returned no process handle");
        return Ok(SpawnedProcess::untracked(0, path));
    }
    let pid = unsafe { GetProcessId(info.hProcess) };
    // SAFETY: SEE_MASK_NOCLOSEPROCESS transfers ownership of hProcess to us.
    let handle = unsafe { OwnedHandle::from_raw_handle(info.hProcess.0 as _) };
    Ok(SpawnedProcess::from_native(pid, handle, path))
}

/// Non-blocking exit check on a process handle.
pub fn process_exited(handle: &OwnedHandle) -> bool {
    unsafe { WaitForSingleObject(HANDLE(handle.as_raw_handle() as _), 0) == WAIT_OBJECT_0 }
}

/// Open `path` with its associated handler.
pub fn shell_open(path: &Path) -> Result<()> {
    let file = wide(path.as_os_str());
    let result = unsafe {
        ShellExecuteW(
            HWND::default(),
            w!("open"),
            PCWSTR(file.as_ptr()),
            PCWSTR::null(),
            PCWSTR::null(),
            SW_SHOWNORMAL,
        )
    };
    let code = result.0 as isize;
    if code > SHELL_EXECUTE_OK {
        Ok(())
    } else {
        Err(Error::os("ShellExecuteW", format!("code {code}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_number_parses_trailing_digits() {
        let dev: Vec<u16> = "\\\\.\\DISPLAY12\0\0".encode_utf16().collect();
        assert_eq!(device_number(&dev), Some(12));
        let none: Vec<u16> = "\\\\.\\DISPLAY\0".encode_utf16().collect();
        assert_eq!(device_number(&none), None);
    }
}
