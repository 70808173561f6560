use dbsdk_rs::math::Vector3;

pub fn parse_vec3(src: &str) -> Option<Vector3> {
    let mut split = src.split_whitespace();
    let x = split.next()?.parse::<f32>().ok()?;
    let y = split.next()?.parse::<f32>().ok()?;
    let z = split.next()?.parse::<f32>().ok()?;

    // trailing garbage means the value was not a vector
    if split.next().is_some() {
        return None;
    }

    return Some(Vector3::new(x, y, z));
}

/// Parses `;` separated boxes of six numbers each: `ox oy oz w h d`
pub fn parse_box_list(src: &str) -> Option<Vec<(Vector3, Vector3)>> {
    let mut boxes = Vec::new();

    for item in src.split(';').filter(|s| !s.trim().is_empty()) {
        let v = item.split_whitespace().map(|c| c.parse::<f32>().ok()).collect::<Option<Vec<f32>>>()?;
        if v.len() != 6 {
            return None;
        }
        boxes.push((Vector3::new(v[0], v[1], v[2]), Vector3::new(v[3], v[4], v[5])));
    }

    Some(boxes)
}

pub fn parse_flag(src: &str) -> Option<bool> {
    match src.trim() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None
    }
}
