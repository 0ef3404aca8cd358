use std::collections::HashMap;

use bytes::Bytes;
use honggfuzz::fuzz;
use tbnbt::{AdapterRegistry, from_bytes, from_slice, to_bytes, to_vec};

fn main() {
    let registry = AdapterRegistry::new();
    loop {
        fuzz!(|data: &[u8]| {
            // Duplicate keys collapse on the first encoding; it is stable after that.
            if let Ok((name, tag)) = from_slice(data) {
                let bytes = to_vec(&name, &tag).expect("decoded tree must encode");
                let (again_name, again) = from_slice(&bytes).expect("re-read");
                assert_eq!(again_name, name);
                assert_eq!(to_vec(&again_name, &again).expect("re-encode"), bytes);
            }

            let shared = Bytes::copy_from_slice(data);
            if let Ok((name, tag)) = from_bytes(&shared) {
                let _ = to_bytes(&name, &tag);
            }

            if let Ok(map) = registry.from_slice::<HashMap<String, Vec<i32>>>(data) {
                let _ = registry.to_vec(&map);
            }
            if let Ok(strings) = registry.from_slice::<Vec<String>>(data) {
                let _ = registry.to_vec(&strings);
            }
        });
    }
}
