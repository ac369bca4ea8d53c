use jdoc_model::{is_primitive, TypeRef};
use url::Url;

use crate::error::{ParseError, Result};

/// Resolve a relative hyperlink found on a page of `package` to the fully
/// qualified name of the type it points to.
///
/// The package is treated as a directory (`pkg.sub` is `/pkg/sub/`), the link is
/// joined onto it, and the `.html` suffix is dropped. Any `#fragment` is ignored;
/// member-level references collapse to their declaring type.
pub fn resolve_href(package: &str, href: &str) -> Result<String> {
    let unresolvable = || ParseError::UnresolvableReference {
        package: package.to_string(),
        href: href.to_string(),
    };

    let mut root = String::from("file:///");
    for segment in package.split('.').filter(|s| !s.is_empty()) {
        root.push_str(segment);
        root.push('/');
    }
    let base = Url::parse(&root).map_err(|_| unresolvable())?;
    let target = base.join(href.trim()).map_err(|_| unresolvable())?;
    // Links into other documentation sets carry no package root.
    if target.scheme() != "file" {
        return Err(unresolvable());
    }

    let stem = target
        .path()
        .strip_prefix('/')
        .and_then(|path| path.strip_suffix(".html"))
        .ok_or_else(unresolvable)?;
    let sane = !stem.is_empty()
        && stem.split('/').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c == '_' || c == '$' || c.is_alphanumeric())
        });
    if !sane {
        return Err(unresolvable());
    }

    Ok(stem.replace('/', "."))
}

/// Turn a type token into a [`TypeRef`], qualifying bare names with `package`.
///
/// Primitives and `void` stay as they are, and dotted names are taken as already
/// qualified. Trailing `[]` groups become array dimensions.
pub fn qualify(package: &str, token: &str) -> Result<TypeRef> {
    let ty = TypeRef::parse(token).map_err(|_| ParseError::InvalidType(token.to_string()))?;
    if package.is_empty() || is_primitive(ty.name()) || ty.name().contains('.') {
        return Ok(ty);
    }
    Ok(TypeRef::array(format!("{package}.{}", ty.name()), ty.dims()))
}
