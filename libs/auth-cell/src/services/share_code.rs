use rand::Rng;

const SHARE_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SHARE_CODE_LEN: usize = 8;

/// Random `XXXX-YYYY` code handed to support members out of band.
pub fn generate_share_code() -> String {
    let mut rng = rand::thread_rng();
    let mut code = String::with_capacity(SHARE_CODE_LEN + 1);

    for i in 0..SHARE_CODE_LEN {
        if i == SHARE_CODE_LEN / 2 {
            code.push('-');
        }
        let idx = rng.gen_range(0..SHARE_CODE_ALPHABET.len());
        code.push(SHARE_CODE_ALPHABET[idx] as char);
    }

    code
}
