// src/core/html.rs

/// ASCII-only lowercase. Byte offsets stay valid against the original.
pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

/// Iterator over `<tag ...>...</tag>` blocks, case-insensitive, non-nesting.
/// Yields (open_tag, inner) slices of the original document.
pub struct TagBlocks<'a> {
    doc: &'a str,
    lc: String,
    open: String,
    close: String,
    pos: usize,
}

impl<'a> TagBlocks<'a> {
    pub fn new(doc: &'a str, tag: &str) -> Self {
        let tag = to_lower(tag);
        Self {
            doc,
            lc: to_lower(doc),
            open: join!("<", &tag),
            close: join!("</", &tag, ">"),
            pos: 0,
        }
    }
}

impl<'a> Iterator for TagBlocks<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let start = self.lc.get(self.pos..)?.find(&self.open)? + self.pos;
            let after_name = start + self.open.len();

            // "<tr" must not match "<track"
            let boundary = self.lc[after_name..].chars().next()?;
            if !(boundary == '>' || boundary == '/' || boundary.is_ascii_whitespace()) {
                self.pos = after_name;
                continue;
            }

            let open_end = self.doc[start..].find('>')? + start + 1;
            let close_rel = self.lc[open_end..].find(&self.close)?;
            let close_start = open_end + close_rel;
            self.pos = close_start + self.close.len();

            return Some((&self.doc[start..open_end], &self.doc[open_end..close_start]));
        }
    }
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    super::sanitize::normalize_ws(&out)
}
