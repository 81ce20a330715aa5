// Late-bound IDispatch helpers
// Property get/put and method calls by member name, as a scripting client would

use std::ptr;

use toolone_core::port::{AutomationError, AutomationResult};
use windows::core::{Interface, BSTR, GUID, HSTRING, IUnknown, PCWSTR, VARIANT};
use windows::Win32::System::Com::{
    CLSIDFromProgID, CoCreateInstance, CoInitializeEx, CoUninitialize, IDispatch,
    CLSCTX_LOCAL_SERVER, COINIT_APARTMENTTHREADED, DISPATCH_FLAGS, DISPATCH_METHOD,
    DISPATCH_PROPERTYGET, DISPATCH_PROPERTYPUT, DISPPARAMS,
};
use windows::Win32::System::Ole::DISPID_PROPERTYPUT;

const LOCALE_USER_DEFAULT: u32 = 0x0400;
const DISPID_VALUE: i32 = 0;

/// COM apartment for the current thread, released on drop
pub(crate) struct ComApartment;

impl ComApartment {
    pub(crate) fn enter() -> AutomationResult<Self> {
        // S_FALSE (already initialized) still needs a balancing CoUninitialize
        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };
        hr.ok()
            .map_err(|e| AutomationError::Unavailable(format!("CoInitializeEx failed: {e}")))?;
        Ok(Self)
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        unsafe { CoUninitialize() };
    }
}

/// An automation object plus the member path used to reach it
#[derive(Clone)]
pub(crate) struct Dispatch {
    inner: IDispatch,
    path: String,
}

impl Dispatch {
    /// Launch or attach to the local server registered under `prog_id`
    pub(crate) fn create(prog_id: &str) -> AutomationResult<Self> {
        let wide = HSTRING::from(prog_id);
        let clsid = unsafe { CLSIDFromProgID(PCWSTR(wide.as_ptr())) }
            .map_err(|e| AutomationError::Unavailable(format!("{prog_id}: {e}")))?;

        let inner: IDispatch = unsafe { CoCreateInstance(&clsid, None, CLSCTX_LOCAL_SERVER) }
            .map_err(|e| AutomationError::Unavailable(format!("{prog_id}: {e}")))?;

        Ok(Self {
            inner,
            path: "Application".to_string(),
        })
    }

    pub(crate) fn get(&self, name: &str) -> AutomationResult<VARIANT> {
        let id = self.member_id(name)?;
        self.invoke(id, name, DISPATCH_PROPERTYGET, Vec::new())
    }

    pub(crate) fn put(&self, name: &str, value: VARIANT) -> AutomationResult<()> {
        let id = self.member_id(name)?;
        self.invoke(id, name, DISPATCH_PROPERTYPUT, vec![value])
            .map(|_| ())
    }

    pub(crate) fn call(&self, name: &str, args: Vec<VARIANT>) -> AutomationResult<VARIANT> {
        let id = self.member_id(name)?;
        self.invoke(id, name, DISPATCH_METHOD, args)
    }

    /// Default member lookup, i.e. `collection[key]`
    pub(crate) fn item(&self, key: VARIANT) -> AutomationResult<VARIANT> {
        self.invoke(
            DISPID_VALUE,
            "Item",
            DISPATCH_METHOD | DISPATCH_PROPERTYGET,
            vec![key],
        )
    }

    pub(crate) fn item_object(&self, key: VARIANT, label: &str) -> AutomationResult<Dispatch> {
        let value = self.item(key)?;
        self.wrap(value, &format!("[{label}]"))?
            .ok_or_else(|| AutomationError::NotFound(format!("{}[{}]", self.path, label)))
    }

    pub(crate) fn object(&self, name: &str) -> AutomationResult<Dispatch> {
        self.optional_object(name)?
            .ok_or_else(|| AutomationError::NotFound(format!("{}.{}", self.path, name)))
    }

    /// Object-valued property that may be `Nothing`
    pub(crate) fn optional_object(&self, name: &str) -> AutomationResult<Option<Dispatch>> {
        let value = self.get(name)?;
        self.wrap(value, &format!(".{name}"))
    }

    pub(crate) fn get_string(&self, name: &str) -> AutomationResult<String> {
        let value = self.get(name)?;
        BSTR::try_from(&value)
            .map(|s| s.to_string())
            .map_err(|e| self.conversion_error(name, e))
    }

    pub(crate) fn get_i32(&self, name: &str) -> AutomationResult<i32> {
        let value = self.get(name)?;
        i32::try_from(&value).map_err(|e| self.conversion_error(name, e))
    }

    pub(crate) fn get_bool(&self, name: &str) -> AutomationResult<bool> {
        let value = self.get(name)?;
        bool::try_from(&value).map_err(|e| self.conversion_error(name, e))
    }

    /// The object as an argument for another call
    pub(crate) fn as_variant(&self) -> VARIANT {
        let unknown: IUnknown = self.inner.clone().into();
        VARIANT::from(unknown)
    }

    pub(crate) fn path(&self) -> &str {
        &self.path
    }

    /// Object-valued result, `None` for `Nothing`
    pub(crate) fn wrap(&self, value: VARIANT, suffix: &str) -> AutomationResult<Option<Dispatch>> {
        if value.is_empty() {
            return Ok(None);
        }
        let Ok(unknown) = IUnknown::try_from(&value) else {
            return Ok(None);
        };
        let path = format!("{}{}", self.path, suffix);
        let inner = unknown
            .cast::<IDispatch>()
            .map_err(|e| AutomationError::call(path.clone(), e.to_string()))?;

        Ok(Some(Dispatch { inner, path }))
    }

    fn member_id(&self, name: &str) -> AutomationResult<i32> {
        let wide = HSTRING::from(name);
        let names = [PCWSTR(wide.as_ptr())];
        let mut id = 0i32;

        let found = unsafe {
            self.inner.GetIDsOfNames(
                &GUID::zeroed(),
                names.as_ptr(),
                1,
                LOCALE_USER_DEFAULT,
                &mut id,
            )
        };
        found.map_err(|e| AutomationError::NotFound(format!("{}.{}: {}", self.path, name, e)))?;

        Ok(id)
    }

    fn invoke(
        &self,
        id: i32,
        name: &str,
        flags: DISPATCH_FLAGS,
        mut args: Vec<VARIANT>,
    ) -> AutomationResult<VARIANT> {
        // IDispatch takes positional arguments last-to-first
        args.reverse();
        let mut named = DISPID_PROPERTYPUT;
        let is_put = flags == DISPATCH_PROPERTYPUT;

        let params = DISPPARAMS {
            rgvarg: if args.is_empty() {
                ptr::null_mut()
            } else {
                args.as_mut_ptr()
            },
            rgdispidNamedArgs: if is_put {
                &mut named as *mut i32
            } else {
                ptr::null_mut()
            },
            cArgs: args.len() as u32,
            cNamedArgs: u32::from(is_put),
        };

        let mut result = VARIANT::default();
        let invoked = unsafe {
            self.inner.Invoke(
                id,
                &GUID::zeroed(),
                LOCALE_USER_DEFAULT,
                flags,
                &params,
                Some(&mut result as *mut VARIANT),
                None,
                None,
            )
        };
        invoked
            .map_err(|e| AutomationError::call(format!("{}.{}", self.path, name), e.to_string()))?;

        Ok(result)
    }

    fn conversion_error(&self, name: &str, e: windows::core::Error) -> AutomationError {
        AutomationError::call(
            format!("{}.{}", self.path, name),
            format!("unexpected value type: {e}"),
        )
    }
}

pub(crate) fn text(value: &str) -> VARIANT {
    VARIANT::from(BSTR::from(value))
}

pub(crate) fn index(value: usize) -> AutomationResult<VARIANT> {
    i32::try_from(value)
        .map(VARIANT::from)
        .map_err(|_| AutomationError::InvalidState(format!("index {value} out of range")))
}
